/// Wave pattern table
///
/// Difficulty cycles through four fixed tiers driven by the spawn-tick count.
use crate::entities::WavePattern;

pub const WAVE_PATTERNS: [WavePattern; 4] = [
    // Light
    WavePattern {
        spawn_chance: 0.15,
        enemy_count: 3,
        meteor_chance: 0.2,
        fast_chance: 0.15,
    },
    // Medium
    WavePattern {
        spawn_chance: 0.18,
        enemy_count: 4,
        meteor_chance: 0.3,
        fast_chance: 0.25,
    },
    // Heavy
    WavePattern {
        spawn_chance: 0.22,
        enemy_count: 5,
        meteor_chance: 0.4,
        fast_chance: 0.35,
    },
    // Chaos
    WavePattern {
        spawn_chance: 0.25,
        enemy_count: 6,
        meteor_chance: 0.5,
        fast_chance: 0.4,
    },
];

/// Tier index for a wave timer value.  A zero phase length pins tier 0.
pub fn wave_phase(wave_timer: u32, phase_ticks: u32) -> usize {
    if phase_ticks == 0 {
        return 0;
    }
    ((wave_timer / phase_ticks) as usize) % WAVE_PATTERNS.len()
}

pub fn wave_pattern(wave_timer: u32, phase_ticks: u32) -> WavePattern {
    WAVE_PATTERNS[wave_phase(wave_timer, phase_ticks)]
}
