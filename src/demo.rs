//! Runs the three pattern demonstrations in order and writes the transcript.

use std::io::Write;
use std::rc::Rc;

use colored::Colorize;
use tracing::info;

use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::facade::GameEngineFacade;
use crate::flyweight::{FlyweightRegistry, MapElement, MapElementKind};
use crate::proxy::{ProxyServer, RealServer, Server};

pub const SEPARATOR: &str = "----------------------------------------------";

/// Counters gathered while the demo ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoSummary {
    pub flyweights_created: usize,
    pub facade_lines: usize,
    pub proxy_fetches: usize,
    pub cache_hits: usize,
}

pub fn run<W: Write>(config: &DemoConfig, out: &mut W) -> Result<DemoSummary, DemoError> {
    let mut summary = DemoSummary::default();

    header(out, config, "Flyweight  pattern")?;
    summary.flyweights_created = run_flyweight(config, out)?;

    writeln!(out, "{SEPARATOR}")?;
    header(out, config, "Facade pattern")?;
    summary.facade_lines = run_facade(out)?;

    writeln!(out, "{SEPARATOR}")?;
    header(out, config, "Proxy pattern")?;
    let (fetches, hits) = run_proxy(config, out)?;
    summary.proxy_fetches = fetches;
    summary.cache_hits = hits;

    info!(?summary, "demo finished");
    Ok(summary)
}

fn header<W: Write>(out: &mut W, config: &DemoConfig, title: &str) -> Result<(), DemoError> {
    if config.output.color {
        writeln!(out, "{}", title.bold().cyan())?;
    } else {
        writeln!(out, "{title}")?;
    }
    Ok(())
}

fn run_flyweight<W: Write>(config: &DemoConfig, out: &mut W) -> Result<usize, DemoError> {
    let mut registry = FlyweightRegistry::new();
    let mut placed: Vec<(Rc<MapElement>, i32, i32)> = Vec::new();

    for placement in &config.flyweight.placements {
        let kind: MapElementKind = placement.kind.parse()?;
        let verb = if registry.contains(kind) { "Reused" } else { "Created" };
        let element = registry.get_or_create(kind);
        writeln!(out, "{verb} flyweight: {kind}")?;
        placed.push((element, placement.x, placement.y));
    }

    for (element, x, y) in &placed {
        writeln!(out, "{}", element.draw(*x, *y))?;
    }

    let created = registry.created_count();
    if config.flyweight.clear_after_draw {
        let released = registry.len();
        registry.clear();
        writeln!(out, "Flyweight registry cleared ({released} elements released)")?;
    }

    info!(created, "flyweight demo done");
    Ok(created)
}

fn run_facade<W: Write>(out: &mut W) -> Result<usize, DemoError> {
    let mut engine = GameEngineFacade::new();
    let mut count = 0;

    for lines in [engine.initialize(), engine.update(), engine.shutdown()] {
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        count += lines.len();
    }

    Ok(count)
}

fn run_proxy<W: Write>(config: &DemoConfig, out: &mut W) -> Result<(usize, usize), DemoError> {
    let mut proxy = ProxyServer::with_policy(config.proxy.connect_policy);

    if config.proxy.connect_first {
        if proxy.connect() {
            writeln!(out, "{}", RealServer::CONNECT_NOTE)?;
        } else {
            writeln!(out, "Connection to the real server failed")?;
        }
    }

    for key in &config.proxy.requests {
        let fetched = proxy.fetch(key)?;
        for note in fetched.notes() {
            writeln!(out, "{note}")?;
        }
        writeln!(out, "Received: {}", fetched.data)?;
    }

    let fetches = proxy.real_server().map_or(0, RealServer::fetch_count);
    let (hits, _) = proxy.stats();
    Ok((fetches, hits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Placement;
    use crate::proxy::ConnectPolicy;

    fn plain_config() -> DemoConfig {
        let mut config = DemoConfig::default();
        config.output.color = false;
        config
    }

    fn transcript(config: &DemoConfig) -> (String, DemoSummary) {
        let mut out = Vec::new();
        let summary = run(config, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_default_transcript() {
        let (text, summary) = transcript(&plain_config());

        let expected = "\
Flyweight  pattern
Created flyweight: Tree
Created flyweight: Building
Created flyweight: Road
Created flyweight: Lake
Created flyweight: Car
Created flyweight: River
Drawing Tree of type Pine at (10, 20) with texture PineTexture
Drawing Building of type Skyscraper at (50, 30) with 50 floors.
Drawing Road of type Asphalt at (100, 40) with material Asphalt
Drawing Lake of type Mountain at (150, 50) with size 1.5 and color Blue
Drawing Car of brand Tesla at (200, 60) with color Red
Drawing River named Amazon at (250, 70) with width 10 and color Brown
Flyweight registry cleared (6 elements released)
----------------------------------------------
Facade pattern
Initializing Render System
Initializing Physics System
Initializing Audio System
Init complete
Updating Render System
Updating Physics System
Updating Audio System
Update complete
Shutting down Render System
Shutting down Physics System
Shutting down Audio System
Shutdown complete
----------------------------------------------
Proxy pattern
Connecting to the real server...
Retrieving data from the real server...
Received: Real Server Data: image_1
Loading data from cache...
Received: Real Server Data: image_1
Retrieving data from the real server...
Received: Real Server Data: image_2
Loading data from cache...
Received: Real Server Data: image_2
";
        assert_eq!(text, expected);
        assert_eq!(
            summary,
            DemoSummary {
                flyweights_created: 6,
                facade_lines: 12,
                proxy_fetches: 2,
                cache_hits: 2,
            }
        );
    }

    #[test]
    fn test_repeated_kind_is_reused() {
        let mut config = plain_config();
        config.flyweight.placements = vec![
            Placement::new("Tree", 0, 0),
            Placement::new("Tree", 5, 5),
        ];
        config.flyweight.clear_after_draw = false;

        let (text, summary) = transcript(&config);
        assert!(text.contains("Created flyweight: Tree\nReused flyweight: Tree\n"));
        assert!(!text.contains("registry cleared"));
        assert_eq!(summary.flyweights_created, 1);
    }

    #[test]
    fn test_unknown_kind_aborts() {
        let mut config = plain_config();
        config.flyweight.placements = vec![Placement::new("Boat", 0, 0)];

        let mut out = Vec::new();
        let err = run(&config, &mut out).unwrap_err();
        assert!(matches!(err, DemoError::UnknownKind { ref kind, .. } if kind == "Boat"));
    }

    #[test]
    fn test_lazy_connect_without_explicit_connect() {
        let mut config = plain_config();
        config.proxy.connect_first = false;
        config.proxy.requests = vec!["image_1".to_string()];

        let (text, summary) = transcript(&config);
        assert!(text.ends_with(
            "Proxy pattern\n\
             Connecting to the real server...\n\
             Retrieving data from the real server...\n\
             Received: Real Server Data: image_1\n"
        ));
        assert_eq!(summary.proxy_fetches, 1);
    }

    #[test]
    fn test_strict_policy_without_connect_fails() {
        let mut config = plain_config();
        config.proxy.connect_first = false;
        config.proxy.connect_policy = ConnectPolicy::Strict;

        let mut out = Vec::new();
        let err = run(&config, &mut out).unwrap_err();
        assert!(matches!(err, DemoError::NotConnected { .. }));
    }
}
