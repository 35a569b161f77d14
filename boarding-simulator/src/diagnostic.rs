use std::time::Duration;

/// Timing of one completed zone.
#[derive(Debug, Default, Clone)]
pub struct ZoneMetrics {
    pub zone: usize,
    pub passengers: usize,
    pub ticks: u64,
    /// Wall-clock seconds.
    pub time: f64,
}

#[derive(Debug, Default, Clone)]
pub struct BoardingLog {
    pub zones: Vec<ZoneMetrics>,
    pub total_ticks: u64,
    pub total_time: f64,
}

impl BoardingLog {
    pub fn push(&mut self, metrics: ZoneMetrics) {
        self.total_ticks += metrics.ticks;
        self.total_time += metrics.time;
        self.zones.push(metrics);
    }

    pub fn seated(&self) -> usize {
        self.zones.iter().map(|z| z.passengers).sum()
    }

    pub fn total_duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_time)
    }
}

/// Counts of one scheduler tick.
#[derive(Debug, Default, Clone)]
pub struct StepMetrics {
    pub spawned: usize,
    pub moved: usize,
    pub blocked: usize,
    pub seated: usize,
    pub time_tick: f64,
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;

    use super::*;

    #[test]
    fn test_boarding_log() {
        let mut log = BoardingLog::default();
        log.push(ZoneMetrics {
            zone: 1,
            passengers: 20,
            ticks: 300,
            time: 0.25,
        });
        log.push(ZoneMetrics {
            zone: 2,
            passengers: 4,
            ticks: 120,
            time: 0.5,
        });

        assert_eq!(log.total_ticks, 420);
        assert_eq!(log.seated(), 24);
        assert_float_absolute_eq!(log.total_time, 0.75, 1e-9);
        assert_float_absolute_eq!(log.total_duration().as_secs_f64(), 0.75, 1e-9);
    }
}
