pub mod cabin;
pub mod collision;
pub mod diagnostic;
pub mod error;
pub mod layout;
pub mod navigation;
mod neighbor_grid;
pub mod passenger;
pub mod registry;
pub mod scene;
pub mod scheduler;
pub mod shape;
pub mod spawn;
pub mod util;

use cabin::CabinConfig;
use collision::CollisionSurface;
use diagnostic::BoardingLog;
use error::LayoutError;
use glam::{vec2, Vec2};
use layout::{LayoutModel, SeatId};
use log::info;
use passenger::Phase;
use registry::ShapeRegistry;
use scheduler::{BoardingScheduler, FixedGroups, SectionZones, StepReport, ZoningStrategy};
use shape::ShapeId;

/// Simulator instance.
pub struct Simulator<S: CollisionSurface = ShapeRegistry> {
    pub layout: LayoutModel,
    pub surface: S,
    pub scheduler: BoardingScheduler,
}

impl Simulator<ShapeRegistry> {
    /// Builds the cabin on a headless [`ShapeRegistry`].
    pub fn new(cabin: &CabinConfig, options: &SimulatorOptions) -> Result<Self, LayoutError> {
        Self::with_surface(cabin, options, |layout| {
            ShapeRegistry::new(
                vec2(layout.fuselage.width, layout.fuselage.height),
                2.0 * layout.passenger_diameter,
            )
        })
    }
}

impl<S: CollisionSurface> Simulator<S> {
    /// Builds the cabin on a surface created from the derived layout.
    pub fn with_surface(
        cabin: &CabinConfig,
        options: &SimulatorOptions,
        surface: impl FnOnce(&LayoutModel) -> S,
    ) -> Result<Self, LayoutError> {
        let layout = LayoutModel::new(cabin, options.window_width)?;
        let mut surface = surface(&layout);
        scene::build(&layout, &mut surface);

        let zoning = options.zoning.strategy();
        let scheduler = BoardingScheduler::new(
            &layout,
            zoning.as_ref(),
            fastrand::Rng::with_seed(options.seed),
        );

        info!("Simulator initialization finished");
        info!("Simulator options: {options:#?}");

        Ok(Simulator {
            layout,
            surface,
            scheduler,
        })
    }

    /// Runs one tick.
    pub fn tick(&mut self) -> StepReport {
        self.scheduler.step(&self.layout, &mut self.surface)
    }

    pub fn is_finished(&self) -> bool {
        self.scheduler.is_finished()
    }

    /// Ticks until every zone is seated, or until `limit` ticks have run in
    /// total.
    pub fn run(&mut self, limit: Option<u64>) -> BoardingOutcome {
        while !self.is_finished() {
            if limit.is_some_and(|limit| self.scheduler.ticks() >= limit) {
                return BoardingOutcome::TickLimit {
                    ticks: self.scheduler.ticks(),
                    seated: self.scheduler.seated_count(),
                };
            }
            self.tick();
        }

        BoardingOutcome::Finished {
            ticks: self.scheduler.ticks(),
        }
    }

    pub fn log(&self) -> &BoardingLog {
        self.scheduler.log()
    }

    pub fn list_passengers(&self) -> Vec<PassengerView> {
        self.scheduler
            .passengers()
            .map(|p| PassengerView {
                seat: p.seat,
                zone: p.zone,
                position: p.position(),
                phase: p.phase(),
                shape: p.shape(),
            })
            .collect()
    }

    pub fn get_passenger_count(&self) -> usize {
        self.scheduler.passenger_count()
    }

    /// Closes the surface. The simulator does nothing useful afterwards.
    pub fn close(&mut self) {
        self.surface.close();
    }
}

/// Snapshot of a passenger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassengerView {
    pub seat: SeatId,
    pub zone: usize,
    pub position: Vec2,
    pub phase: Phase,
    pub shape: Option<ShapeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardingOutcome {
    Finished { ticks: u64 },
    TickLimit { ticks: u64, seated: usize },
}

/// Simulator options.
#[derive(Debug, Clone)]
pub struct SimulatorOptions {
    /// Canvas width in pixels; the cabin scales to it.
    pub window_width: f32,
    pub zoning: Zoning,
    /// Seed of the skin tone generator.
    pub seed: u64,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        SimulatorOptions {
            window_width: 1350.0,
            zoning: Zoning::Groups(20),
            seed: 0,
        }
    }
}

/// Boarding zone policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoning {
    /// Fixed-size groups front to back.
    Groups(usize),
    /// One zone per class, rear class in two halves.
    Sections,
}

impl Zoning {
    pub fn strategy(self) -> Box<dyn ZoningStrategy> {
        match self {
            Zoning::Groups(size) => Box::new(FixedGroups(size)),
            Zoning::Sections => Box::new(SectionZones),
        }
    }
}
