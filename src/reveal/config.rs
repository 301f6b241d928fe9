//! Reveal pacing configuration.

use std::time::Duration;

/// One catch-up tier: when the gap is strictly above `above`, advance by `jump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTier {
    /// Gap (in graphemes) that must be exceeded for this tier to apply.
    pub above: usize,
    /// Graphemes revealed per tick while this tier applies.
    pub jump: usize,
}

impl JumpTier {
    /// Create a new tier.
    pub const fn new(above: usize, jump: usize) -> Self {
        Self { above, jump }
    }
}

/// Step-size table used to catch the displayed text up with the source.
///
/// The further behind the display falls, the larger the step. Once the gap
/// is small the reveal slows to `base_jump`, except right at the start of a
/// message where `kickstart_jump` gets the first characters on screen faster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    /// Catch-up tiers, checked from the largest threshold down.
    pub tiers: Vec<JumpTier>,
    /// Cursor positions below this use `kickstart_jump` for small gaps.
    pub kickstart_below: usize,
    /// Step used for small gaps near the start of a message.
    pub kickstart_jump: usize,
    /// Step used for small gaps everywhere else.
    pub base_jump: usize,
}

impl Default for JumpTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                JumpTier::new(100, 20),
                JumpTier::new(50, 5),
                JumpTier::new(10, 2),
            ],
            kickstart_below: 5,
            kickstart_jump: 2,
            base_jump: 1,
        }
    }
}

impl JumpTable {
    /// Replace the catch-up tiers. They are kept sorted by descending threshold.
    #[must_use]
    pub fn with_tiers(mut self, tiers: impl IntoIterator<Item = JumpTier>) -> Self {
        self.tiers = tiers.into_iter().collect();
        self.tiers.sort_by(|a, b| b.above.cmp(&a.above));
        self
    }

    /// Set the kickstart window and step.
    #[must_use]
    pub const fn with_kickstart(mut self, below: usize, jump: usize) -> Self {
        self.kickstart_below = below;
        self.kickstart_jump = jump;
        self
    }

    /// Set the step used for small gaps.
    #[must_use]
    pub const fn with_base_jump(mut self, jump: usize) -> Self {
        self.base_jump = jump;
        self
    }

    /// Graphemes to reveal this tick for a gap of `delta` at position `cursor`.
    ///
    /// Never returns more than `delta`, and returns at least 1 whenever
    /// `delta > 0` so a reveal always terminates.
    pub fn jump_for(&self, delta: usize, cursor: usize) -> usize {
        if delta == 0 {
            return 0;
        }

        let jump = self
            .tiers
            .iter()
            .find(|tier| delta > tier.above)
            .map_or_else(
                || {
                    if cursor < self.kickstart_below {
                        self.kickstart_jump
                    } else {
                        self.base_jump
                    }
                },
                |tier| tier.jump,
            );

        jump.clamp(1, delta)
    }

    /// Gap size beyond which [`jump_for`](Self::jump_for) no longer changes.
    ///
    /// Callers only need to count that many graphemes of the backlog.
    pub fn saturation(&self) -> usize {
        self.tiers
            .iter()
            .map(|tier| tier.above.saturating_add(1).max(tier.jump))
            .chain([self.kickstart_jump, self.base_jump, 1])
            .max()
            .unwrap_or(1)
    }
}

/// Configuration for a [`Reveal`](super::Reveal) controller.
#[derive(Debug, Clone)]
pub struct RevealConfig {
    /// Period of the reveal tick.
    pub tick_interval: Duration,
    /// Step-size table.
    pub jumps: JumpTable,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(10),
            jumps: JumpTable::default(),
        }
    }
}

impl RevealConfig {
    /// Set the tick period.
    #[must_use]
    pub const fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the step-size table.
    #[must_use]
    pub fn with_jumps(mut self, jumps: JumpTable) -> Self {
        self.jumps = jumps;
        self
    }
}
