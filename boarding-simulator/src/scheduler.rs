use std::time::{Duration, Instant};

use log::{info, warn};

use crate::{
    collision::CollisionSurface,
    diagnostic::{BoardingLog, StepMetrics, ZoneMetrics},
    layout::{LayoutModel, SeatId},
    passenger::{Passenger, TickOutcome},
    spawn::SpawnAllocator,
};

/// Ticks without any movement after which a zone is reported as stalled.
pub const STALL_TICKS: u64 = 500;

/// Splits the seat list into boarding zones, boarded in order.
pub trait ZoningStrategy: Send + Sync {
    fn partition(&self, layout: &LayoutModel, seats: &[SeatId]) -> Vec<Vec<SeatId>>;
}

/// Consecutive groups of a fixed size, front to back. The last one may be
/// smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedGroups(pub usize);

impl Default for FixedGroups {
    fn default() -> Self {
        FixedGroups(20)
    }
}

impl ZoningStrategy for FixedGroups {
    fn partition(&self, _layout: &LayoutModel, seats: &[SeatId]) -> Vec<Vec<SeatId>> {
        seats.chunks(self.0.max(1)).map(<[SeatId]>::to_vec).collect()
    }
}

/// One zone per class, with the rear class split in half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionZones;

impl ZoningStrategy for SectionZones {
    fn partition(&self, layout: &LayoutModel, seats: &[SeatId]) -> Vec<Vec<SeatId>> {
        let mut bounds = vec![0];
        let mut total = 0;
        for class in &layout.classes {
            total += class.rows as usize * class.layout.seats();
            bounds.push(total.min(seats.len()));
        }
        if let [.., previous, last] = bounds[..] {
            bounds.push((previous + last) / 2);
        }
        bounds.sort_unstable();
        bounds.dedup();

        bounds
            .windows(2)
            .map(|w| seats[w[0]..w[1]].to_vec())
            .collect()
    }
}

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardingEvent {
    ZoneStarted {
        zone: usize,
        passengers: usize,
    },
    ZoneCompleted {
        zone: usize,
        ticks: u64,
        elapsed: Duration,
    },
    /// Nobody in the zone moved for [`STALL_TICKS`] ticks.
    Stalled {
        zone: usize,
    },
    Finished {
        ticks: u64,
        elapsed: Duration,
    },
}

/// Result of one scheduler tick.
#[derive(Debug, Default, Clone)]
pub struct StepReport {
    /// Zone being boarded, counted from 1.
    pub zone: Option<usize>,
    pub tick: u64,
    pub metrics: StepMetrics,
    pub events: Vec<BoardingEvent>,
}

struct ActiveZone {
    number: usize,
    passengers: Vec<Passenger>,
    first_tick: u64,
    started: Instant,
    idle_ticks: u64,
    stall_reported: bool,
}

/// Boards zones one after another.
pub struct BoardingScheduler {
    zones: Vec<Vec<SeatId>>,
    next_zone: usize,
    active: Option<ActiveZone>,
    boarded: Vec<Passenger>,
    spawner: SpawnAllocator,
    rng: fastrand::Rng,
    tick: u64,
    started: Option<Instant>,
    finished: bool,
    log: BoardingLog,
}

impl BoardingScheduler {
    pub fn new(
        layout: &LayoutModel,
        zoning: &dyn ZoningStrategy,
        rng: fastrand::Rng,
    ) -> Self {
        let zones: Vec<Vec<SeatId>> = zoning
            .partition(layout, layout.seat_list())
            .into_iter()
            .filter(|zone| !zone.is_empty())
            .collect();
        info!(
            "{} passengers in {} zone(s)",
            zones.iter().map(Vec::len).sum::<usize>(),
            zones.len()
        );

        BoardingScheduler {
            zones,
            next_zone: 0,
            active: None,
            boarded: Vec::new(),
            spawner: SpawnAllocator::new(layout),
            rng,
            tick: 0,
            started: None,
            finished: false,
            log: BoardingLog::default(),
        }
    }

    pub fn zones(&self) -> &[Vec<SeatId>] {
        &self.zones
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Zone being boarded, counted from 1.
    pub fn current_zone(&self) -> Option<usize> {
        self.active.as_ref().map(|zone| zone.number)
    }

    pub fn log(&self) -> &BoardingLog {
        &self.log
    }

    pub fn spawner(&self) -> &SpawnAllocator {
        &self.spawner
    }

    /// Passengers of completed zones followed by those of the current one.
    pub fn passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.boarded
            .iter()
            .chain(self.active.iter().flat_map(|zone| zone.passengers.iter()))
    }

    pub fn seated_count(&self) -> usize {
        self.passengers().filter(|p| p.is_seated()).count()
    }

    pub fn passenger_count(&self) -> usize {
        self.zones.iter().map(Vec::len).sum()
    }

    /// Advances every passenger of the current zone once, starting the next
    /// zone first if none is active. Does nothing once all zones are seated.
    pub fn step<S: CollisionSurface + ?Sized>(
        &mut self,
        layout: &LayoutModel,
        surface: &mut S,
    ) -> StepReport {
        let mut report = StepReport {
            tick: self.tick,
            ..Default::default()
        };
        if self.finished {
            return report;
        }

        let instant = Instant::now();
        let started = *self.started.get_or_insert(instant);
        self.tick += 1;
        report.tick = self.tick;

        if self.active.is_none() {
            match self.start_zone(layout) {
                Some(event) => report.events.push(event),
                None => {
                    self.finish(started, &mut report);
                    return report;
                }
            }
        }
        let Some(zone) = self.active.as_mut() else {
            return report;
        };
        report.zone = Some(zone.number);

        let mut progressed = false;
        for passenger in zone.passengers.iter_mut() {
            let outcome = passenger.tick(layout, surface, &mut self.spawner, &mut self.rng);
            match outcome {
                TickOutcome::Spawned => report.metrics.spawned += 1,
                TickOutcome::Moved => report.metrics.moved += 1,
                TickOutcome::Seated => report.metrics.seated += 1,
                TickOutcome::Blocked | TickOutcome::SpawnBlocked => report.metrics.blocked += 1,
                TickOutcome::Idle => {}
            }
            progressed |= outcome.progressed();
        }

        if progressed {
            zone.idle_ticks = 0;
        } else {
            zone.idle_ticks += 1;
            if zone.idle_ticks >= STALL_TICKS && !zone.stall_reported {
                zone.stall_reported = true;
                warn!(
                    "Zone {} has not moved for {} ticks; boarding may be deadlocked",
                    zone.number, zone.idle_ticks
                );
                report.events.push(BoardingEvent::Stalled { zone: zone.number });
            }
        }

        if zone.passengers.iter().all(Passenger::is_seated) {
            let ticks = self.tick - zone.first_tick + 1;
            let elapsed = zone.started.elapsed();
            info!(
                "Zone {} boarded in {} ticks ({:.3} s).",
                zone.number,
                ticks,
                elapsed.as_secs_f64()
            );
            self.log.push(ZoneMetrics {
                zone: zone.number,
                passengers: zone.passengers.len(),
                ticks,
                time: elapsed.as_secs_f64(),
            });
            report.events.push(BoardingEvent::ZoneCompleted {
                zone: zone.number,
                ticks,
                elapsed,
            });

            if let Some(zone) = self.active.take() {
                self.boarded.extend(zone.passengers);
            }
            if self.next_zone >= self.zones.len() {
                self.finish(started, &mut report);
            }
        }

        report.metrics.time_tick = instant.elapsed().as_secs_f64();
        report
    }

    fn start_zone(&mut self, layout: &LayoutModel) -> Option<BoardingEvent> {
        let seats = self.zones.get(self.next_zone)?;
        self.next_zone += 1;
        let number = self.next_zone;

        let passengers: Vec<Passenger> = seats
            .iter()
            .filter_map(|&seat| Passenger::new(layout, number, seat))
            .collect();
        self.spawner.reset();
        info!("Now boarding Zone {number}.");

        let event = BoardingEvent::ZoneStarted {
            zone: number,
            passengers: passengers.len(),
        };
        self.active = Some(ActiveZone {
            number,
            passengers,
            first_tick: self.tick,
            started: Instant::now(),
            idle_ticks: 0,
            stall_reported: false,
        });
        Some(event)
    }

    fn finish(&mut self, started: Instant, report: &mut StepReport) {
        self.finished = true;
        let elapsed = started.elapsed();
        info!(
            "Ready for takeoff! {} passengers boarded in {} ticks ({:.3} s).",
            self.boarded.len(),
            self.tick,
            elapsed.as_secs_f64()
        );
        report.events.push(BoardingEvent::Finished {
            ticks: self.tick,
            elapsed,
        });
    }
}
