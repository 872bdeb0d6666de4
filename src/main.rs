//! Carrom entry point
//!
//! Native: plays a headless match with pseudo-random aimed shots and prints the
//! final HUD. The browser build is driven through `carrom::wasm` instead.
//!
//! Usage: `carrom [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use carrom::Settings;
    use carrom::sim::{GameEvent, SimulationContext};
    use carrom::view::Hud;
    use glam::DVec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    /// Shots before the demo gives up on a winner
    const MAX_SHOTS: u32 = 200;
    /// Ticks allowed for a single shot to settle
    const MAX_SHOT_TICKS: u32 = 10_000;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);

    let settings = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring {}: {}", path, e);
                Settings::default()
            }),
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    log::info!("Carrom (native) starting with seed {}", seed);

    let mut ctx = SimulationContext::with_settings(seed, settings);
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut winner = None;

    for shot in 1..=MAX_SHOTS {
        // Slide the striker somewhere on the baseline and pull back roughly
        // away from the pile in the middle
        let (lo, hi) = ctx.board.striker_x_range();
        ctx.place_striker(rng.random_range(lo..=hi));

        let striker = ctx.striker.pos;
        let target = ctx.board.center()
            + DVec2::new(
                rng.random_range(-120.0..120.0),
                rng.random_range(-120.0..120.0),
            );
        let pull = (striker - target).normalize_or_zero() * rng.random_range(30.0..110.0);
        ctx.aim_at(striker + pull);
        if !ctx.release() {
            continue;
        }

        let ticks = ctx.settle(MAX_SHOT_TICKS);
        log::debug!("Shot {} settled after {} ticks", shot, ticks);

        if let Some(w) = ctx.drain_events().iter().find_map(|e| match e {
            GameEvent::Winner(p) => Some(*p),
            _ => None,
        }) {
            winner = Some(w);
            break;
        }
    }

    match winner {
        Some(p) => println!("Player {} wins", p.number()),
        None => println!("No winner after {} shots", MAX_SHOTS),
    }
    println!("{}", Hud::from_context(&ctx).to_json());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is carrom::wasm::wasm_start, this is just to satisfy the compiler
}
