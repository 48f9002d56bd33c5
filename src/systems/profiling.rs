//! Per-system timing instrumentation.
//!
//! Every scheduled system runs inside a [`profile`] wrapper that records its
//! duration into a rolling window, keyed by [`SystemId`]. The windows feed
//! the frame-budget warning and the timing report printed at shutdown.

use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use bevy_ecs::resource::Resource;
use bevy_ecs::system::{IntoSystem, System};
use bevy_ecs::world::World;
use circular_buffer::CircularBuffer;
use num_width::NumberWidth;
use parking_lot::Mutex;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use thousands::Separable;

/// Capacity of the timing map. Every profiled system needs a slot.
const MAX_SYSTEMS: usize = SystemId::COUNT;
/// How many recent ticks each window keeps.
const TIMING_WINDOW_SIZE: usize = 30;

/// Identities of the profiled systems, plus `Total` for the whole tick.
#[derive(EnumCount, EnumIter, IntoStaticStr, Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum SystemId {
    Total,
    Input,
    Player,
    Scroll,
    Enemy,
    Projectile,
    Collision,
    Combat,
    Spawn,
    Regen,
    Animation,
    Mode,
}

impl Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Into::<&'static str>::into(self).to_ascii_lowercase())
    }
}

/// A rolling window of per-tick durations for one system.
///
/// Ticks where the system did not run are back-filled with zeros, so the
/// window always spans real time rather than just the ticks it ran in.
#[derive(Debug, Default)]
pub struct TimingBuffer {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
    last_tick: u64,
}

impl TimingBuffer {
    /// Records a duration for `tick`.
    ///
    /// # Panics
    ///
    /// Panics if `tick` is older than the last recorded one.
    pub fn add_timing(&mut self, duration: Duration, tick: u64) {
        if tick < self.last_tick {
            panic!("time went backwards: tick ({}) < last_tick ({})", tick, self.last_tick);
        }

        if tick > self.last_tick {
            for _ in 0..(tick - self.last_tick - 1) {
                self.buffer.push_back(Duration::ZERO);
            }
        }
        self.buffer.push_back(duration);
        self.last_tick = tick;
    }

    pub fn most_recent(&self) -> Duration {
        self.buffer.back().copied().unwrap_or(Duration::ZERO)
    }

    /// Mean and standard deviation over the window, via Welford's algorithm.
    pub fn stats(&self) -> (Duration, Duration) {
        let mut samples = 0u16;
        let mut mean = 0.0f32;
        let mut sum_squared_diff = 0.0f32;

        for duration in self.buffer.iter() {
            let secs = duration.as_secs_f32();
            samples += 1;

            let diff = secs - mean;
            mean += diff / samples as f32;
            sum_squared_diff += diff * (secs - mean);
        }

        if samples == 0 {
            return (Duration::ZERO, Duration::ZERO);
        }
        let variance = if samples > 1 {
            sum_squared_diff / (samples - 1) as f32
        } else {
            0.0
        };
        (Duration::from_secs_f32(mean), Duration::from_secs_f32(variance.sqrt()))
    }
}

/// The authoritative tick counter. Atomic so profiled systems can read it
/// without exclusive access.
#[derive(Resource, Debug, Default)]
pub struct Timing {
    current_tick: AtomicU64,
}

impl Timing {
    pub fn current_tick(&self) -> u64 {
        self.current_tick.load(Ordering::Relaxed)
    }

    /// Increments the tick counter and returns the new value.
    pub fn increment_tick(&self) -> u64 {
        self.current_tick.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Rolling timings for every profiled system.
#[derive(Resource, Debug)]
pub struct SystemTimings {
    timings: micromap::Map<SystemId, Mutex<TimingBuffer>, MAX_SYSTEMS>,
}

impl Default for SystemTimings {
    fn default() -> Self {
        // Pre-populate with every variant so recording never allocates.
        let mut timings = micromap::Map::new();
        for id in SystemId::iter() {
            timings.insert(id, Mutex::new(TimingBuffer::default()));
        }
        Self { timings }
    }
}

impl SystemTimings {
    fn buffer(&self, id: SystemId) -> &Mutex<TimingBuffer> {
        self.timings
            .get(&id)
            .expect("SystemId not found in pre-populated map - this is a bug")
    }

    pub fn add_timing(&self, id: SystemId, duration: Duration, tick: u64) {
        self.buffer(id).lock().add_timing(duration, tick);
    }

    /// Records the whole-tick duration, including the scheduler itself.
    pub fn add_total_timing(&self, duration: Duration, tick: u64) {
        self.add_timing(SystemId::Total, duration, tick);
    }

    /// Formats the timing report: effective FPS from the total, then the
    /// most expensive systems, one aligned line each.
    pub fn format_timing_display(&self) -> SmallVec<[String; MAX_SYSTEMS]> {
        let (total_avg, total_std) = self.buffer(SystemId::Total).lock().stats();

        let effective_fps = match 1.0 / total_avg.as_secs_f64() {
            f if f > 100.0 => format!("{:>5} FPS", (f as u32).separate_with_commas()),
            f if f < 10.0 => format!("{:.1} FPS", f),
            f => format!("{:5.0} FPS", f),
        };

        let mut rows = vec![(effective_fps, total_avg, total_std)];

        let mut sorted: Vec<(SystemId, (Duration, Duration))> = SystemId::iter()
            .filter(|id| *id != SystemId::Total)
            .map(|id| (id, self.buffer(id).lock().stats()))
            .collect();
        sorted.sort_by(|a, b| b.1.0.cmp(&a.1.0));

        for (id, (avg, std_dev)) in sorted.iter().take(9) {
            rows.push((id.to_string(), *avg, *std_dev));
        }

        format_timing_rows(rows)
    }

    /// Returns the systems likely responsible for a slow tick.
    ///
    /// Any system that took at least 2ms on the latest tick qualifies
    /// outright. If none did, systems accumulate (slowest first) until 30%
    /// of the tick's total is covered, capped at 5 entries.
    pub fn get_slowest_systems(&self) -> SmallVec<[(SystemId, Duration); 5]> {
        let mut recents: Vec<(SystemId, Duration)> = Vec::new();
        let mut total = Duration::ZERO;

        for id in SystemId::iter() {
            if id == SystemId::Total {
                continue;
            }
            let recent = self.buffer(id).lock().most_recent();
            recents.push((id, recent));
            total += recent;
        }

        recents.sort_by(|a, b| b.1.cmp(&a.1));

        let over_threshold: SmallVec<[(SystemId, Duration); 5]> = recents
            .iter()
            .filter(|(_, duration)| duration.as_millis() >= 2)
            .copied()
            .collect();
        if !over_threshold.is_empty() {
            return over_threshold;
        }

        let threshold = total.as_nanos() as f64 * 0.3;
        let mut accumulated = 0u128;
        let mut result = SmallVec::new();
        for (id, duration) in recents.iter().take(5) {
            result.push((*id, *duration));
            accumulated += duration.as_nanos();
            if accumulated as f64 >= threshold {
                break;
            }
        }
        result
    }
}

/// Wraps a system so each run is timed under `id`.
///
/// The wrapper owns the inner system and initializes it lazily on first
/// run, which lets it be registered like any ordinary system.
pub fn profile<S, M>(id: SystemId, system: S) -> impl FnMut(&mut World)
where
    S: IntoSystem<(), (), M> + 'static,
{
    let mut system: S::System = IntoSystem::into_system(system);
    let mut is_initialized = false;
    move |world: &mut World| {
        if !is_initialized {
            system.initialize(world);
            is_initialized = true;
        }

        let start = Instant::now();
        system.run((), world);
        let duration = start.elapsed();

        if let (Some(timings), Some(timing)) = (world.get_resource::<SystemTimings>(), world.get_resource::<Timing>())
        {
            timings.add_timing(id, duration, timing.current_tick());
        }
    }
}

/// Splits a duration into integer part, decimal part and unit.
fn get_value(duration: &Duration) -> (u64, u32, &'static str) {
    match duration {
        n if n >= &Duration::from_secs(1) => (n.as_secs(), (n.as_millis() % 1000) as u32, "s"),
        n if n >= &Duration::from_millis(1) => (n.as_millis() as u64, (n.as_micros() % 1000) as u32, "ms"),
        n if n >= &Duration::from_micros(1) => (n.as_micros() as u64, (n.as_nanos() % 1000) as u32, "µs"),
        n => (n.as_nanos() as u64, 0, "ns"),
    }
}

/// Aligns rows of `(label, mean, stddev)` into fixed-width report lines.
fn format_timing_rows(rows: impl IntoIterator<Item = (String, Duration, Duration)>) -> SmallVec<[String; MAX_SYSTEMS]> {
    struct Row {
        label: String,
        avg: (u64, u32, &'static str),
        std: (u64, u32, &'static str),
    }

    let rows: SmallVec<[Row; MAX_SYSTEMS]> = rows
        .into_iter()
        .map(|(label, avg, std_dev)| Row {
            label,
            avg: get_value(&avg),
            std: get_value(&std_dev),
        })
        .collect();
    if rows.is_empty() {
        return SmallVec::new();
    }

    let (avg_int_w, avg_dec_w, std_int_w, std_dec_w) = rows.iter().fold((0, 3, 0, 3), |widths, row| {
        (
            widths.0.max(row.avg.0.width() as usize),
            widths.1.max(row.avg.1.width() as usize),
            widths.2.max(row.std.0.width() as usize),
            widths.3.max(row.std.1.width() as usize),
        )
    });
    let label_w = SystemId::iter()
        .map(|id| id.to_string().len())
        .max()
        .unwrap_or_default();

    rows.iter()
        .map(|row| {
            format!(
                "{label:label_w$} : {avg_int:avg_int_w$}.{avg_dec:<avg_dec_w$}{avg_unit} ± {std_int:std_int_w$}.{std_dec:<std_dec_w$}{std_unit}",
                label = row.label,
                avg_int = row.avg.0,
                avg_dec = row.avg.1,
                avg_unit = row.avg.2,
                std_int = row.std.0,
                std_dec = row.std.1,
                std_unit = row.std.2,
            )
        })
        .collect()
}
