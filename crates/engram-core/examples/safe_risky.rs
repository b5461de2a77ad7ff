//! Safe Versus Risky Choice
//!
//! An instance-based learning model of repeated binary choice: a safe
//! option always paying 1 against a risky option paying 3 a third of the
//! time. Expected values are equal, yet simulated participants drift
//! toward the safe option — the learned memories of zero payoffs loom
//! larger than the occasional 3. Classic risk aversion from nothing but
//! memory dynamics.
//!
//! Run with: `cargo run --example safe_risky`

use engram_core::{attrs, Memory};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const PARTICIPANTS: usize = 1_000;
const ROUNDS: usize = 60;

fn main() {
	let mut memory = Memory::new();
	let mut payoff_rng = StdRng::from_entropy();
	let mut risky_chosen = [0usize; ROUNDS];

	for _ in 0..PARTICIPANTS {
		memory.reset(false);
		// Prepopulate one instance per outcome to seed exploration.
		for (choice, outcome) in [("safe", 1), ("risky", 0), ("risky", 2)] {
			let _ = memory
				.learn(attrs! { "choice" => choice, "outcome" => outcome })
				.expect("learnable instance");
		}
		let _ = memory.advance(1.0).expect("non-negative advance");

		for chosen in risky_chosen.iter_mut() {
			let (choice, _blended) = memory
				.best_blend("outcome", ["safe", "risky"], "choice", &attrs! {})
				.expect("blendable outcome")
				.expect("both choices prepopulated");
			let name = choice.as_text().expect("choices are text").to_owned();
			let payoff = if name == "risky" {
				*chosen += 1;
				if payoff_rng.gen::<f64>() < 1.0 / 3.0 {
					3
				} else {
					0
				}
			} else {
				1
			};
			let _ = memory
				.learn_and_advance(attrs! { "choice" => name, "outcome" => payoff }, 1.0)
				.expect("learnable outcome");
		}
	}

	println!(
		"Safe (1 always) versus risky (3 × 1/3, 0 × 2/3), σ={}, d={:?}",
		memory.noise(),
		memory.decay()
	);
	println!("round\tfraction choosing risky");
	for (round, count) in risky_chosen.iter().enumerate() {
		if round % 5 == 0 || round == ROUNDS - 1 {
			println!("{round}\t{:.3}", *count as f64 / PARTICIPANTS as f64);
		}
	}
}
