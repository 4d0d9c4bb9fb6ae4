//! Property-based tests for the search engine on real mosaic positions.
//!
//! Covers:
//! - Backpropagation conservation: every updated node gains exactly the
//!   discounted rewards and one visit
//! - Pruning thresholds on generated move lists
//! - Legal, reproducible decisions from every controller

use mosaic_core::{Game, Player, Rewards, TileAction};
use mosaic_game::{MosaicGame, MosaicState};
use mosaic_mcts::{
    depth_for_branching, Minimax, Mcts, NodeId, PruningRules, RolloutPolicy, SearchConfig,
    Simulator, Tree,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

const BUDGET: Duration = Duration::from_secs(60);

// =============================================================================
// Strategies for generating test inputs
// =============================================================================

fn arb_seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// A position in the first round with tiles left to draft.
fn arb_position() -> impl Strategy<Value = MosaicState> {
    (arb_seed(), 0usize..12).prop_map(|(seed, plies)| {
        let game = MosaicGame;
        let mut state = game.new_game(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..plies {
            let player = state.to_move();
            let moves = game.legal_actions(&state, player);
            if moves.len() <= 1 || !game.has_remaining_material(&state) {
                break;
            }
            let idx = rand::Rng::gen_range(&mut rng, 0..moves.len());
            let next = game.apply(&state, player, &moves[idx]).unwrap();
            if !game.has_remaining_material(&next) {
                break;
            }
            state = next;
        }
        state
    })
}

fn arb_rewards() -> impl Strategy<Value = Rewards> {
    (-50.0f64..50.0, -50.0f64..50.0).prop_map(|(a, b)| Rewards::new(a, b))
}

// =============================================================================
// Backpropagation conservation
// =============================================================================

proptest! {
    /// Every ancestor gains exactly `[r0 * g^m, r1 * g^m]` and one visit.
    #[test]
    fn prop_backprop_conservation(
        state in arb_position(),
        rewards in arb_rewards(),
        gamma in 0.5f64..=1.0,
        move_count in 0u32..30,
        pick in any::<prop::sample::Index>(),
    ) {
        let game = MosaicGame;
        let rules = PruningRules::default();
        let mut tree = Tree::new(state.to_move(), state);
        tree.expand(&game, NodeId::ROOT, None, &rules).unwrap();
        let child = *pick.get(tree.children(NodeId::ROOT));
        tree.expand(&game, child, None, &rules).unwrap();
        let leaf = tree.children(child).first().copied().unwrap_or(child);

        // Give the path some history first.
        tree.backpropagate(leaf, Rewards::new(1.0, 2.0));
        let mut path = vec![leaf];
        if leaf != child {
            path.push(child);
        }
        path.push(NodeId::ROOT);
        let before: Vec<_> = path.iter().map(|&id| tree.get(id).stats.clone()).collect();

        let discounted = rewards.discounted(gamma, move_count);
        tree.backpropagate(leaf, discounted);

        for (&id, old) in path.iter().zip(&before) {
            let new = &tree.get(id).stats;
            prop_assert_eq!(new.visit_count, old.visit_count + 1);
            for player in Player::ALL {
                let expected = old.reward_sum[player] + rewards[player] * gamma.powi(move_count as i32);
                prop_assert!((new.reward_sum[player] - expected).abs() < 1e-9);
            }
        }
    }

    /// Expanding twice never duplicates children.
    #[test]
    fn prop_expansion_idempotent(state in arb_position()) {
        let game = MosaicGame;
        let rules = PruningRules::default();
        let mut tree = Tree::new(state.to_move(), state);

        let added = tree.expand(&game, NodeId::ROOT, None, &rules).unwrap();
        prop_assert!(added > 0);
        prop_assert_eq!(tree.expand(&game, NodeId::ROOT, None, &rules).unwrap(), 0);
        prop_assert_eq!(tree.children(NodeId::ROOT).len(), added);
        prop_assert_eq!(tree.len(), added + 1);

        // Children belong to the opponent.
        let owner = tree.root().owner;
        for &id in tree.children(NodeId::ROOT) {
            prop_assert_eq!(tree.get(id).owner, owner.opponent());
        }
    }
}

// =============================================================================
// Pruning thresholds
// =============================================================================

proptest! {
    /// Large generated move lists lose speculative and floor-only moves.
    #[test]
    fn prop_pruning_on_generated_moves(state in arb_position()) {
        let game = MosaicGame;
        let moves = game.legal_actions(&state, state.to_move());
        let total = moves.len();
        let pruned = PruningRules::default().prune(moves);

        for mv in &pruned {
            if total > 50 {
                let speculative = mv.to_pattern_line() == 1
                    && matches!(mv.destination_line(), Some(3) | Some(4));
                prop_assert!(!speculative, "{} kept with {} candidates", mv, total);
            }
            if total > 30 {
                prop_assert!(mv.to_floor_line() != mv.tile_count(), "{} kept", mv);
            }
        }
        if total <= 30 {
            prop_assert_eq!(pruned.len(), total);
        }
    }
}

// =============================================================================
// Decisions
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Full MCTS returns a legal move and visits root children once per iteration.
    #[test]
    fn prop_full_mcts_decision(seed in arb_seed(), iterations in 1u32..60, state in arb_position()) {
        let game = MosaicGame;
        let player = state.to_move();
        let moves = game.legal_actions(&state, player);

        let config = SearchConfig::with_iterations(iterations);
        let rng = ChaCha8Rng::seed_from_u64(seed);
        let simulator = Simulator::new(rng.clone(), config.rollout_policy);
        let mut mcts = Mcts::new(config, simulator, rng);

        let result = mcts.search(&game, &state, player, moves.clone(), BUDGET).unwrap();

        prop_assert!(moves.contains(&result.best_action));
        prop_assert_eq!(result.iterations, iterations);
        let visits: u32 = result.root_children.iter().map(|c| c.visits).sum();
        prop_assert_eq!(visits, iterations);
    }

    /// Same seed, same decision.
    #[test]
    fn prop_mcts_deterministic(seed in arb_seed(), state in arb_position()) {
        let game = MosaicGame;
        let player = state.to_move();
        let moves = game.legal_actions(&state, player);

        let run = || {
            let config = SearchConfig {
                max_iterations: Some(40),
                time_limit: BUDGET,
                ..SearchConfig::light()
            };
            let rng = ChaCha8Rng::seed_from_u64(seed);
            let simulator = Simulator::new(rng.clone(), config.rollout_policy);
            Mcts::new(config, simulator, rng)
                .search(&game, &state, player, moves.clone(), BUDGET)
                .unwrap()
        };

        let (a, b) = (run(), run());
        prop_assert_eq!(a.best_action, b.best_action);
        prop_assert_eq!(a.root_children, b.root_children);
    }

    /// Minimax picks its depth from the pruned root and returns a legal move.
    #[test]
    fn prop_minimax_depth_from_root(seed in arb_seed(), state in arb_position()) {
        let game = MosaicGame;
        let player = state.to_move();
        let moves = game.legal_actions(&state, player);
        let branching = PruningRules::default().prune(moves.clone()).len();
        prop_assume!(branching > 7);

        let simulator = Simulator::new(ChaCha8Rng::seed_from_u64(seed), RolloutPolicy::Naive);
        let minimax = Minimax::new(simulator, PruningRules::default());
        let result = minimax.search(&game, &state, player, moves.clone()).unwrap();

        prop_assert!(moves.contains(&result.best_action));
        prop_assert_eq!(result.depth, depth_for_branching(branching));
        if result.depth == 0 {
            prop_assert_eq!(result.nodes_visited, branching as u64);
        }
    }
}
