//! Terminal rendering of the intersection for headless runs

use std::time::Duration;

use super::types::{Approach, LightState, Signal};

/// One signal head, e.g. `N[R .]` when red is lit or `E[. G]` when green is lit
fn signal_head(lights: &LightState, approach: Approach) -> String {
    let lamp = |lamp: Signal, glyph: char| {
        if lights.get(approach) == lamp {
            glyph
        } else {
            '.'
        }
    };
    let initial = approach
        .name()
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?');
    format!("{}[{} {}]", initial, lamp(Signal::Red, 'R'), lamp(Signal::Green, 'G'))
}

/// Draw the crossing with the four signal heads placed on their roads
pub fn draw_intersection(lights: &LightState, at: Duration) -> String {
    let north = signal_head(lights, Approach::North);
    let east = signal_head(lights, Approach::East);
    let south = signal_head(lights, Approach::South);
    let west = signal_head(lights, Approach::West);

    let mut out = String::new();
    out.push_str(&format!("=== Intersection @ {} ms ===\n", at.as_millis()));
    out.push_str(&format!("            {}\n", north));
    out.push_str("              ||\n");
    out.push_str(&format!("   {} ==++== {}\n", west, east));
    out.push_str("              ||\n");
    out.push_str(&format!("            {}\n", south));
    out.push_str(&format!("Lit: {}\n", lights.lit_labels().join(", ")));
    out
}
