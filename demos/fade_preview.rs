//! # Fade Preview
//!
//! Prints the CC values a fade sends for a few curve settings.
//!
//! **Concepts:** `FadeTable`, curve shapes, de-duplicated steps
//!
//! ```bash
//! cargo run --example fade_preview
//! ```

use midibutton::settings::DEFAULT_SAMPLE_INTERVAL_MS;
use midibutton::{FadeDirection, FadeTable};

fn main() {
    for curve in [-3.0, 0.0, 3.0] {
        let Some(table) = FadeTable::new(0, 127, 1.0, curve, DEFAULT_SAMPLE_INTERVAL_MS) else {
            continue;
        };
        let up = table.steps(FadeDirection::In);
        let down = table.steps(FadeDirection::Out);
        println!("curve {curve:+.1}: {} steps in, {} steps out", up.len(), down.len());

        // Value after each quarter of the fade.
        let quarters: Vec<String> = (0..=4)
            .filter_map(|q| table.sample(FadeDirection::In, table.len() * q / 4))
            .map(|v| format!("{v:.1}"))
            .collect();
        println!("  in at 0/25/50/75/100%: {}", quarters.join(", "));
    }
}
