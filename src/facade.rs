//! Facade pattern: one engine type fronting the render, physics and audio
//! subsystems.

use tracing::debug;

/// Lifecycle shared by the engine subsystems. Each call returns a line
/// describing what the subsystem did.
pub trait Subsystem {
    fn name(&self) -> &'static str;

    fn initialize(&mut self) -> String {
        format!("Initializing {} System", self.name())
    }

    fn update(&mut self) -> String {
        format!("Updating {} System", self.name())
    }

    fn shutdown(&mut self) -> String {
        format!("Shutting down {} System", self.name())
    }
}

pub mod subsystems {
    use super::Subsystem;

    #[derive(Debug, Default)]
    pub struct RenderSystem;

    impl Subsystem for RenderSystem {
        fn name(&self) -> &'static str {
            "Render"
        }
    }

    #[derive(Debug, Default)]
    pub struct PhysicsSystem;

    impl Subsystem for PhysicsSystem {
        fn name(&self) -> &'static str {
            "Physics"
        }
    }

    #[derive(Debug, Default)]
    pub struct AudioSystem;

    impl Subsystem for AudioSystem {
        fn name(&self) -> &'static str {
            "Audio"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initialize,
    Update,
    Shutdown,
}

impl Phase {
    fn completion(self) -> &'static str {
        match self {
            Phase::Initialize => "Init complete",
            Phase::Update => "Update complete",
            Phase::Shutdown => "Shutdown complete",
        }
    }
}

/// Facade over the engine subsystems.
///
/// Every call runs Render, Physics and Audio in that order and always all
/// three, then appends one completion line.
#[derive(Debug, Default)]
pub struct GameEngineFacade {
    render: subsystems::RenderSystem,
    physics: subsystems::PhysicsSystem,
    audio: subsystems::AudioSystem,
}

impl GameEngineFacade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&mut self) -> Vec<String> {
        self.run(Phase::Initialize)
    }

    pub fn update(&mut self) -> Vec<String> {
        self.run(Phase::Update)
    }

    pub fn shutdown(&mut self) -> Vec<String> {
        self.run(Phase::Shutdown)
    }

    fn run(&mut self, phase: Phase) -> Vec<String> {
        let subsystems: [&mut dyn Subsystem; 3] =
            [&mut self.render, &mut self.physics, &mut self.audio];

        let mut lines: Vec<String> = subsystems
            .into_iter()
            .map(|subsystem| {
                debug!(subsystem = subsystem.name(), ?phase, "dispatching");
                match phase {
                    Phase::Initialize => subsystem.initialize(),
                    Phase::Update => subsystem.update(),
                    Phase::Shutdown => subsystem.shutdown(),
                }
            })
            .collect();

        lines.push(phase.completion().to_string());
        lines
    }
}
