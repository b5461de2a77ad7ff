//! Rock-Paper-Scissors Between Two Rememberers
//!
//! Two players share one memory of past rounds. Each predicts the
//! opponent's next move by retrieving a chunk matching the recent
//! history — player 1 looks one move back, player 2 two moves back —
//! and plays the move that defeats the expectation. With no usable
//! expectation, they play randomly.
//!
//! Run with: `cargo run --example rock_paper_scissors`

use engram_core::{attrs, Attributes, Memory, Parameters, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ROUNDS: usize = 100;
const MOVES: [&str; 3] = ["paper", "rock", "scissors"];

fn move_index(name: &str) -> usize {
	MOVES.iter().position(|&m| m == name).expect("a legal move")
}

fn defeat_expectation(memory: &mut Memory, rng: &mut StdRng, probe: &Attributes) -> &'static str {
	let expectation = memory
		.retrieve(probe)
		.expect("retrieval succeeds")
		.and_then(|chunk| chunk.get("move").and_then(Value::as_text).map(str::to_owned));
	match expectation {
		Some(name) => MOVES[(move_index(&name) + MOVES.len() - 1) % MOVES.len()],
		None => MOVES[rng.gen_range(0..MOVES.len())],
	}
}

fn with_lags(player: &str, lags: &[(&str, Option<&str>)]) -> Attributes {
	let mut attributes = attrs! { "player" => player };
	for (name, value) in lags {
		if let Some(value) = value {
			let _ = attributes.insert(*name, *value);
		}
	}
	attributes
}

fn main() {
	let mut memory = Memory::with_parameters(Parameters {
		noise: 0.1,
		..Parameters::default()
	})
	.expect("valid parameters");
	let mut rng = StdRng::from_entropy();
	let mut plays1: Vec<&str> = Vec::new();
	let mut plays2: Vec<&str> = Vec::new();
	let mut score: i64 = 0;

	for round in 0..ROUNDS {
		let last1 = plays1.last().copied();
		let last2 = plays2.last().copied();
		let prior1 = plays1.len().checked_sub(2).map(|i| plays1[i]);

		let move1 =
			defeat_expectation(&mut memory, &mut rng, &with_lags("player2", &[("ultimate", last2)]));
		let move2 = defeat_expectation(
			&mut memory,
			&mut rng,
			&with_lags("player1", &[("ultimate", last1), ("penultimate", prior1)]),
		);

		let winner = (move_index(move2) + MOVES.len() - move_index(move1)) % MOVES.len();
		score += if winner == 2 { -1 } else { winner as i64 };
		println!(
			"Round {round:3}\tPlayer 1: {move1:8}\tPlayer 2: {move2:8}\tWinner: {winner}\tScore: {score:4}"
		);

		let mut experience1 = with_lags("player1", &[("ultimate", last1), ("penultimate", prior1)]);
		let _ = experience1.insert("move", move1);
		let _ = memory
			.learn_and_advance(experience1, 1.0)
			.expect("learnable experience");
		let mut experience2 = with_lags("player2", &[("ultimate", last2)]);
		let _ = experience2.insert("move", move2);
		let _ = memory
			.learn_and_advance(experience2, 2.0)
			.expect("learnable experience");

		plays1.push(move1);
		plays2.push(move2);
	}

	println!("\n{} chunks learned over {ROUNDS} rounds", memory.len());
}
