//! Deadline-driven animation sequencer.
//!
//! Holds the resolved list produced from a prompt response and steps through
//! it as hold deadlines pass. Time is the session clock (time since `init`),
//! passed in by the caller on every call.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, DEFAULT_ANIMATION_SECS};
use crate::classify::is_movement_animation;

/// Shortest hold for a movement item.
pub const MIN_MOVEMENT_HOLD_MS: f32 = 3000.0;
/// Shortest hold for an auto-play item.
pub const MIN_AUTOPLAY_HOLD_MS: f32 = 1500.0;
/// Extra time after an auto-play animation finishes before moving on.
pub const AUTOPLAY_TAIL_MS: f32 = 500.0;
/// Movement holds are jittered uniformly by up to this many seconds.
pub const MOVEMENT_JITTER_SECS: f32 = 0.8;

/// Hold time for a movement item.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn movement_hold(per_action_secs: f32, jitter_secs: f32) -> Duration {
    let ms = ((per_action_secs + jitter_secs) * 1000.0).max(MIN_MOVEMENT_HOLD_MS);
    Duration::from_millis(ms.round() as u64)
}

/// Hold time for an auto-play item of the given catalog length. Missing or
/// non-positive lengths count as [`DEFAULT_ANIMATION_SECS`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn autoplay_hold(duration_secs: Option<f32>) -> Duration {
    let secs = duration_secs
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(DEFAULT_ANIMATION_SECS);
    let ms = (secs * 1000.0 + AUTOPLAY_TAIL_MS).max(MIN_AUTOPLAY_HOLD_MS);
    Duration::from_millis(ms.round() as u64)
}

/// The resolved animation list and the playhead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    items: Vec<String>,
    index: usize,
    active: bool,
    generation: u64,
}

impl Sequence {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The item under the playhead, while active.
    pub fn current(&self) -> Option<&str> {
        if !self.active {
            return None;
        }
        self.items.get(self.index).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deadline {
    at: Duration,
    generation: u64,
}

/// Result of [`Sequencer::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceStep {
    /// Nothing due yet, or no sequence running.
    Holding,
    /// Moved on to the item at `index`.
    Advanced { index: usize },
    /// The last item's hold ran out. The sequence is now inactive.
    Completed,
}

pub struct Sequencer {
    rng: ChaCha8Rng,
    per_action_secs: f32,
    sequence: Sequence,
    deadline: Option<Deadline>,
    /// Time left on the current hold while suspended.
    suspended: Option<Duration>,
    default_secs: f32,
    durations: Vec<f32>,
}

impl Sequencer {
    pub fn new(seed: u64, per_action_secs: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            per_action_secs,
            sequence: Sequence::default(),
            deadline: None,
            suspended: None,
            default_secs: DEFAULT_ANIMATION_SECS,
            durations: Vec::new(),
        }
    }

    /// Length used for auto-play items the catalog has no duration for.
    #[must_use]
    pub fn with_default_animation_secs(mut self, secs: f32) -> Self {
        self.default_secs = secs;
        self
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn current_item(&self) -> Option<&str> {
        self.sequence.current()
    }

    pub fn is_active(&self) -> bool {
        self.sequence.active
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// When the current hold runs out, unless suspended.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline.map(|d| d.at)
    }

    /// Resolves `labels` and starts a new sequence at `now`.
    ///
    /// Unresolvable labels are dropped. Returns `false`, leaving no sequence
    /// running, when nothing resolves. Any previous sequence is replaced and
    /// its pending deadline becomes stale.
    pub fn start(&mut self, labels: &[String], catalog: &Catalog, now: Duration) -> bool {
        let items: Vec<String> = labels
            .iter()
            .filter_map(|label| catalog.resolve(label))
            .map(str::to_owned)
            .collect();

        let generation = self.sequence.generation + 1;
        self.suspended = None;
        self.deadline = None;

        if items.is_empty() {
            tracing::info!("[sequence] no playable animations in {labels:?}");
            self.sequence = Sequence {
                generation,
                ..Sequence::default()
            };
            self.durations.clear();
            return false;
        }

        self.durations = items
            .iter()
            .map(|n| catalog.duration_of(n).unwrap_or(self.default_secs))
            .collect();
        self.sequence = Sequence {
            items,
            index: 0,
            active: true,
            generation,
        };
        self.schedule(now);
        true
    }

    /// Steps forward if the current hold has expired at `now`.
    pub fn advance(&mut self, now: Duration) -> SequenceStep {
        let Some(deadline) = self.deadline else {
            return SequenceStep::Holding;
        };
        if deadline.generation != self.sequence.generation {
            self.deadline = None;
            return SequenceStep::Holding;
        }
        if now < deadline.at {
            return SequenceStep::Holding;
        }

        self.sequence.index += 1;
        if self.sequence.index >= self.sequence.items.len() {
            self.sequence.active = false;
            self.deadline = None;
            tracing::info!("[sequence] complete, returning to manual control");
            return SequenceStep::Completed;
        }
        self.schedule(now);
        SequenceStep::Advanced {
            index: self.sequence.index,
        }
    }

    /// Freezes the current hold. No-op without a running deadline.
    pub fn suspend(&mut self, now: Duration) {
        if let Some(deadline) = self.deadline.take() {
            self.suspended = Some(deadline.at.saturating_sub(now));
        }
    }

    /// Restarts a suspended hold with the time that was left on it.
    pub fn resume(&mut self, now: Duration) {
        if let Some(remaining) = self.suspended.take()
            && self.sequence.active
        {
            self.deadline = Some(Deadline {
                at: now + remaining,
                generation: self.sequence.generation,
            });
        }
    }

    /// Drops the running sequence.
    pub fn stop(&mut self) {
        self.sequence.active = false;
        self.deadline = None;
        self.suspended = None;
    }

    fn schedule(&mut self, now: Duration) {
        let index = self.sequence.index;
        let name = &self.sequence.items[index];
        let movement = is_movement_animation(name);
        let hold = if movement {
            let jitter = self
                .rng
                .random_range(-MOVEMENT_JITTER_SECS..=MOVEMENT_JITTER_SECS);
            movement_hold(self.per_action_secs, jitter)
        } else {
            autoplay_hold(self.durations.get(index).copied())
        };

        tracing::info!(
            "[sequence {}/{}] playing {} for {}s ({})",
            index + 1,
            self.sequence.items.len(),
            name,
            hold.as_secs_f32().round(),
            if movement { "movement" } else { "auto-play" }
        );

        self.deadline = Some(Deadline {
            at: now + hold,
            generation: self.sequence.generation,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AnimationCatalogEntry;

    fn catalog() -> Catalog {
        Catalog::new([
            AnimationCatalogEntry::new("idle", 1.0),
            AnimationCatalogEntry::new("walk", 1.0),
            AnimationCatalogEntry::new("general/twerk", 3.0),
            AnimationCatalogEntry::new("memeBeats/faint", 0.0),
        ])
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_autoplay_hold() {
        assert_eq!(autoplay_hold(Some(1.0)), ms(1500));
        assert_eq!(autoplay_hold(Some(3.0)), ms(3500));
        assert_eq!(autoplay_hold(Some(0.2)), ms(1500));
        assert_eq!(autoplay_hold(None), ms(2500));
        assert_eq!(autoplay_hold(Some(0.0)), ms(2500));
    }

    #[test]
    fn test_movement_hold_bounds() {
        assert_eq!(movement_hold(20.0, 0.0), ms(20_000));
        assert_eq!(movement_hold(1.0, 0.8), ms(3000));
        assert_eq!(movement_hold(0.0, -0.8), ms(3000));

        let mut sequencer = Sequencer::new(12345, 20.0);
        let c = catalog();
        for _ in 0..200 {
            sequencer.start(&labels(&["walk"]), &c, Duration::ZERO);
            let hold = sequencer.deadline().expect("deadline");
            assert!(hold >= ms(19_200) && hold <= ms(20_800), "{hold:?}");
        }
    }

    #[test]
    fn test_start_resolves_and_drops_unknown() {
        let mut sequencer = Sequencer::new(42, 20.0);
        assert!(sequencer.start(
            &labels(&["walk", "twerk", "unknownmove", "walk"]),
            &catalog(),
            Duration::ZERO
        ));
        let seq = sequencer.sequence();
        assert_eq!(seq.items(), &labels(&["walk", "general/twerk", "walk"]));
        assert_eq!(seq.index(), 0);
        assert!(seq.is_active());
        assert_eq!(sequencer.current_item(), Some("walk"));
    }

    #[test]
    fn test_nothing_resolvable_starts_nothing() {
        let mut sequencer = Sequencer::new(42, 20.0);
        assert!(!sequencer.start(&labels(&["nope", ""]), &catalog(), Duration::ZERO));
        assert!(!sequencer.is_active());
        assert_eq!(sequencer.current_item(), None);
        assert_eq!(sequencer.deadline(), None);
    }

    #[test]
    fn test_advances_on_deadline_and_completes() {
        let mut sequencer = Sequencer::new(42, 20.0);
        let c = catalog();
        sequencer.start(&labels(&["twerk", "idle"]), &c, Duration::ZERO);

        assert_eq!(sequencer.advance(ms(3499)), SequenceStep::Holding);
        assert_eq!(sequencer.advance(ms(3500)), SequenceStep::Advanced { index: 1 });
        assert_eq!(sequencer.current_item(), Some("idle"));
        assert_eq!(sequencer.deadline(), Some(ms(5000)));

        assert_eq!(sequencer.advance(ms(5000)), SequenceStep::Completed);
        assert!(!sequencer.is_active());
        assert_eq!(sequencer.current_item(), None);
        assert_eq!(sequencer.advance(ms(99_999)), SequenceStep::Holding);
    }

    #[test]
    fn test_new_sequence_replaces_old_deadline() {
        let mut sequencer = Sequencer::new(42, 20.0);
        let c = catalog();
        sequencer.start(&labels(&["idle", "twerk"]), &c, Duration::ZERO);
        let first_generation = sequencer.sequence().generation();

        sequencer.start(&labels(&["twerk"]), &c, ms(1000));
        assert!(sequencer.sequence().generation() > first_generation);
        // The old idle hold (1500ms) must not move the new sequence.
        assert_eq!(sequencer.advance(ms(1500)), SequenceStep::Holding);
        assert_eq!(sequencer.current_item(), Some("general/twerk"));
        assert_eq!(sequencer.advance(ms(4500)), SequenceStep::Completed);
    }

    #[test]
    fn test_suspend_preserves_remaining_hold() {
        let mut sequencer = Sequencer::new(42, 20.0);
        let c = catalog();
        sequencer.start(&labels(&["twerk", "idle"]), &c, Duration::ZERO);

        sequencer.suspend(ms(1000));
        assert!(sequencer.is_suspended());
        // Past the original deadline, but suspended.
        assert_eq!(sequencer.advance(ms(10_000)), SequenceStep::Holding);
        assert_eq!(sequencer.sequence().index(), 0);

        sequencer.resume(ms(10_000));
        assert_eq!(sequencer.deadline(), Some(ms(12_500)));
        assert_eq!(sequencer.advance(ms(12_499)), SequenceStep::Holding);
        assert_eq!(sequencer.advance(ms(12_500)), SequenceStep::Advanced { index: 1 });
    }

    #[test]
    fn test_missing_duration_defaults() {
        let mut sequencer = Sequencer::new(42, 20.0);
        sequencer.start(&labels(&["faint"]), &catalog(), Duration::ZERO);
        assert_eq!(sequencer.current_item(), Some("memeBeats/faint"));
        assert_eq!(sequencer.deadline(), Some(ms(2500)));
    }

    #[test]
    fn test_configured_default_duration() {
        let mut sequencer = Sequencer::new(42, 20.0).with_default_animation_secs(4.0);
        sequencer.start(&labels(&["faint"]), &catalog(), Duration::ZERO);
        assert_eq!(sequencer.deadline(), Some(ms(4500)));
    }

    #[test]
    fn test_same_seed_same_holds() {
        let c = catalog();
        let run = |seed| {
            let mut s = Sequencer::new(seed, 20.0);
            (0..5)
                .map(|_| {
                    s.start(&labels(&["walk"]), &c, Duration::ZERO);
                    s.deadline()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(12345), run(12345));
    }
}
