//! Precomputed CC fade curves.
//!
//! A fade is sampled every `sample_interval_ms` milliseconds. The in-table runs
//! from the start value to the target, the out-table mirrors it back. Only
//! integer steps that actually change the emitted value are sent, so
//! [`FadeTable::steps`] and [`Fader::tick`] skip repeated samples.

use crate::action::{DataByte, MAX_FADE_TIME_SECS};

/// Sample interval used by the playback timer.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeDirection {
    /// From the first value towards the second.
    In,
    /// From the second value back to the first.
    Out,
}

impl FadeDirection {
    pub fn opposite(self) -> Self {
        match self {
            FadeDirection::In => FadeDirection::Out,
            FadeDirection::Out => FadeDirection::In,
        }
    }
}

/// Lookup tables for one button's fade.
#[derive(Debug, Clone, PartialEq)]
pub struct FadeTable {
    from: DataByte,
    to: DataByte,
    in_set: Vec<f64>,
    out_set: Vec<f64>,
}

impl FadeTable {
    /// Build the tables, or `None` when the fade has no length (a zero fade
    /// time or sample interval disables fading) or is longer than
    /// [`MAX_FADE_TIME_SECS`].
    pub fn new(
        from: DataByte,
        to: DataByte,
        fade_time_secs: f64,
        curve: f64,
        sample_interval_ms: u32,
    ) -> Option<Self> {
        if sample_interval_ms == 0
            || !fade_time_secs.is_finite()
            || fade_time_secs <= 0.0
            || fade_time_secs > MAX_FADE_TIME_SECS
        {
            return None;
        }
        let set_size = (fade_time_secs * 1000.0 / sample_interval_ms as f64).round() as usize;
        if set_size == 0 {
            return None;
        }

        let (a, b) = (from as f64, to as f64);
        let shape = |i: usize| -> f64 {
            let t = i as f64 / set_size as f64;
            if curve == 0.0 {
                t
            } else {
                // Time is measured in seconds so the curve keeps its steepness
                // regardless of the sample interval.
                let elapsed = t * fade_time_secs;
                (curve * elapsed).exp_m1() / (curve * fade_time_secs).exp_m1()
            }
        };

        let in_set = (0..=set_size).map(|i| a + (b - a) * shape(i)).collect();
        let out_set = (0..=set_size).map(|i| b + (a - b) * shape(i)).collect();

        Some(Self {
            from,
            to,
            in_set,
            out_set,
        })
    }

    /// Number of sample intervals in the fade.
    #[inline]
    pub fn len(&self) -> usize {
        self.in_set.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn from_value(&self) -> DataByte {
        self.from
    }

    pub fn to_value(&self) -> DataByte {
        self.to
    }

    /// Raw sample `index` of `direction`, before rounding.
    pub fn sample(&self, direction: FadeDirection, index: usize) -> Option<f64> {
        match direction {
            FadeDirection::In => self.in_set.get(index).copied(),
            FadeDirection::Out => self.out_set.get(index).copied(),
        }
    }

    /// Value sent at `index`: floored on the way in, ceiled on the way out.
    fn emitted(&self, direction: FadeDirection, index: usize) -> DataByte {
        let raw = self.sample(direction, index).unwrap_or(0.0);
        let rounded = match direction {
            FadeDirection::In => raw.floor(),
            FadeDirection::Out => raw.ceil(),
        };
        rounded.clamp(0.0, 127.0) as DataByte
    }

    /// Value a fade in `direction` settles on.
    pub fn target(&self, direction: FadeDirection) -> DataByte {
        match direction {
            FadeDirection::In => self.to,
            FadeDirection::Out => self.from,
        }
    }

    /// The de-duplicated values a complete fade emits, ending on the target.
    pub fn steps(&self, direction: FadeDirection) -> Vec<DataByte> {
        let mut steps: Vec<DataByte> = Vec::new();
        for index in 0..self.len() {
            let value = self.emitted(direction, index);
            if steps.last() != Some(&value) {
                steps.push(value);
            }
        }
        let target = self.target(direction);
        if steps.last() != Some(&target) {
            steps.push(target);
        }
        steps
    }
}

/// Playback position within a [`FadeTable`].
///
/// Driven by a timer calling [`Fader::tick`] once per sample interval.
#[derive(Debug, Clone)]
pub struct Fader {
    table: FadeTable,
    direction: FadeDirection,
    index: usize,
    active: bool,
    reversing: bool,
    last: Option<DataByte>,
}

impl Fader {
    pub fn new(table: FadeTable) -> Self {
        Self {
            table,
            direction: FadeDirection::In,
            index: 0,
            active: false,
            reversing: false,
            last: None,
        }
    }

    pub fn table(&self) -> &FadeTable {
        &self.table
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Start a fade from the beginning of `direction`.
    pub fn start(&mut self, direction: FadeDirection) {
        self.direction = direction;
        self.index = 0;
        self.active = true;
        self.reversing = false;
        self.last = None;
    }

    /// Run the current fade backwards. A finished fade is replayed from its end.
    pub fn reverse(&mut self) {
        if !self.active {
            self.index = self.table.len();
            self.last = None;
            self.active = true;
        }
        self.reversing = true;
    }

    /// Pause a running fade or resume a paused one.
    pub fn toggle_pause(&mut self) {
        self.active = !self.active;
    }

    /// Advance one sample. Returns the CC value to send, if it changed.
    pub fn tick(&mut self) -> Option<DataByte> {
        if !self.active {
            return None;
        }

        let value = if !self.reversing {
            if self.index >= self.table.len() {
                self.finish();
                self.table.target(self.direction)
            } else {
                let value = self.table.emitted(self.direction, self.index);
                self.index += 1;
                value
            }
        } else if self.index == 0 {
            self.finish();
            self.table.target(self.direction.opposite())
        } else {
            let value = self.table.emitted(self.direction, self.index);
            self.index -= 1;
            value
        };

        if self.last == Some(value) {
            return None;
        }
        self.last = Some(value);
        Some(value)
    }

    fn finish(&mut self) {
        self.active = false;
        self.reversing = false;
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_time_disables_fade() {
        assert!(FadeTable::new(0, 127, 0.0, 0.0, 10).is_none());
        assert!(FadeTable::new(0, 127, 1.0, 0.0, 0).is_none());
        assert!(FadeTable::new(0, 127, f64::NAN, 0.0, 10).is_none());
    }

    #[test]
    fn test_overlong_fade_is_rejected() {
        assert!(FadeTable::new(0, 127, 1.0e300, 0.0, 10).is_none());
        assert!(FadeTable::new(0, 127, MAX_FADE_TIME_SECS + 0.1, 0.0, 10).is_none());
        let longest = FadeTable::new(0, 127, MAX_FADE_TIME_SECS, 0.0, 1000).unwrap();
        assert_eq!(longest.len(), 360);
    }

    #[test]
    fn test_linear_table() {
        let table = FadeTable::new(0, 100, 1.0, 0.0, 10).unwrap();
        assert_eq!(table.len(), 100);
        assert_relative_eq!(table.sample(FadeDirection::In, 0).unwrap(), 0.0);
        assert_relative_eq!(table.sample(FadeDirection::In, 50).unwrap(), 50.0);
        assert_relative_eq!(table.sample(FadeDirection::In, 100).unwrap(), 100.0);
        assert_relative_eq!(table.sample(FadeDirection::Out, 25).unwrap(), 75.0);
        assert!(table.sample(FadeDirection::In, 101).is_none());
    }

    #[test]
    fn test_curved_table_hits_endpoints() {
        let table = FadeTable::new(10, 110, 2.0, 3.0, 10).unwrap();
        let last = table.len();
        assert_relative_eq!(table.sample(FadeDirection::In, 0).unwrap(), 10.0);
        assert_relative_eq!(
            table.sample(FadeDirection::In, last).unwrap(),
            110.0,
            epsilon = 1e-9
        );
        // Positive curves start slow.
        let mid = table.sample(FadeDirection::In, last / 2).unwrap();
        assert!(mid < 60.0);
    }

    #[test]
    fn test_negative_curve_starts_fast() {
        let table = FadeTable::new(0, 100, 1.0, -4.0, 10).unwrap();
        let mid = table.sample(FadeDirection::In, table.len() / 2).unwrap();
        assert!(mid > 50.0);
    }

    #[test]
    fn test_steps_are_deduplicated() {
        let table = FadeTable::new(0, 10, 1.0, 0.0, 10).unwrap();
        let up = table.steps(FadeDirection::In);
        assert_eq!(up, (0..=10).collect::<Vec<u8>>());

        let down = table.steps(FadeDirection::Out);
        assert_eq!(down, (0..=10).rev().collect::<Vec<u8>>());
    }

    #[test]
    fn test_fader_plays_to_target() {
        let table = FadeTable::new(0, 10, 0.5, 0.0, 10).unwrap();
        let expected = table.steps(FadeDirection::In);
        let mut fader = Fader::new(table);
        fader.start(FadeDirection::In);

        let mut sent = Vec::new();
        for _ in 0..100 {
            if let Some(value) = fader.tick() {
                sent.push(value);
            }
        }
        assert_eq!(sent, expected);
        assert!(!fader.is_active());
    }

    #[test]
    fn test_fader_reverse_returns_to_origin() {
        let table = FadeTable::new(0, 100, 1.0, 0.0, 10).unwrap();
        let mut fader = Fader::new(table);
        fader.start(FadeDirection::In);
        for _ in 0..30 {
            fader.tick();
        }
        fader.reverse();

        let mut last = None;
        while fader.is_active() {
            if let Some(value) = fader.tick() {
                last = Some(value);
            }
        }
        assert_eq!(last, Some(0));
    }

    #[test]
    fn test_paused_fader_emits_nothing() {
        let table = FadeTable::new(0, 100, 1.0, 0.0, 10).unwrap();
        let mut fader = Fader::new(table);
        fader.start(FadeDirection::Out);
        assert_eq!(fader.tick(), Some(100));
        fader.toggle_pause();
        assert_eq!(fader.tick(), None);
        fader.toggle_pause();
        assert_eq!(fader.tick(), Some(99));
    }
}
