use gridq::{
    Direction, Position,
    ports::{FeatureExtractor, FeatureVector, Transition, ValueSource},
    q_learning::{
        Bootstrap, Estimator, LinearEstimator, QLearningAgent, QTable, RewardSchedule,
        choose_action, choose_action_with_draw,
    },
};
use rand::{SeedableRng, rngs::StdRng};

mod common;

use common::{ALL_MOVES, Scripted, Snapshot, approx_eq};

/// Returns the same features for every (state, action).
struct Fixed(Vec<(&'static str, f64)>);

impl FeatureExtractor<Scripted> for Fixed {
    fn extract(&self, _env: &Scripted, _state: &Snapshot, _action: Direction) -> FeatureVector {
        self.0
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn table(alpha: f64) -> QTable {
    QTable::new(alpha, Bootstrap::Current, RewardSchedule::default())
}

fn linear(features: Vec<(&'static str, f64)>, alpha: f64) -> LinearEstimator<Scripted> {
    LinearEstimator::new(Box::new(Fixed(features)), alpha, 0.8)
}

#[test]
fn no_legal_actions_means_zero_value_and_no_action() {
    let stuck = Snapshot::at(2, 2, &[]);
    let mut rng = StdRng::seed_from_u64(1);

    let mut tabular = table(0.5);
    tabular.set(Position::new(2, 2), Position::new(2, 3), 9.0);
    assert_eq!(tabular.best_value(&Scripted, &stuck), 0.0);
    assert_eq!(tabular.best_action(&Scripted, &stuck), None);
    assert_eq!(
        choose_action(&tabular, &Scripted, &stuck, 0.5, &mut rng),
        None
    );

    let approx = linear(vec![("bias", 1.0)], 0.5);
    assert_eq!(approx.best_value(&Scripted, &stuck), 0.0);
    assert_eq!(approx.best_action(&Scripted, &stuck), None);
    assert_eq!(
        choose_action(&approx, &Scripted, &stuck, 0.0, &mut rng),
        None
    );
}

#[test]
fn unseen_pairs_read_as_zero() {
    let tabular = table(0.5);
    let state = Snapshot::at(4, 7, &ALL_MOVES);
    for action in ALL_MOVES {
        assert_eq!(tabular.value(&Scripted, &state, action), 0.0);
    }
    assert_eq!(tabular.get(Position::new(-3, 12), Position::new(-3, 13)), 0.0);
    assert_eq!(tabular.size(), 0);
}

#[test]
fn ties_go_to_the_first_enumerated_action() {
    let mut tabular = table(0.5);
    let here = Position::new(1, 1);
    tabular.set(here, here.step(Direction::North), 3.0);
    tabular.set(here, here.step(Direction::East), 3.0);
    tabular.set(here, here.step(Direction::West), 1.0);

    let east_first = Snapshot::at(1, 1, &[Direction::West, Direction::East, Direction::North]);
    assert_eq!(
        tabular.best_action(&Scripted, &east_first),
        Some(Direction::East)
    );

    let north_first = Snapshot::at(1, 1, &[Direction::North, Direction::East]);
    assert_eq!(
        tabular.best_action(&Scripted, &north_first),
        Some(Direction::North)
    );
    assert_eq!(tabular.best_value(&Scripted, &north_first), 3.0);

    // All-zero values: the first legal action wins.
    let fresh = table(0.5);
    let state = Snapshot::at(5, 5, &[Direction::South, Direction::North]);
    assert_eq!(fresh.best_action(&Scripted, &state), Some(Direction::South));
}

#[test]
fn draw_at_or_below_epsilon_exploits() {
    let mut tabular = table(0.5);
    let here = Position::new(0, 0);
    tabular.set(here, here.step(Direction::West), 2.0);
    let state = Snapshot::at(0, 0, &ALL_MOVES);
    let mut rng = StdRng::seed_from_u64(3);

    for draw in [0.0, 0.1, 0.5] {
        assert_eq!(
            choose_action_with_draw(&tabular, &Scripted, &state, 0.5, draw, &mut rng),
            Some(Direction::West)
        );
    }

    // ε = 1 never explores, whatever the draw.
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_eq!(
            choose_action(&tabular, &Scripted, &state, 1.0, &mut rng),
            Some(Direction::West)
        );
    }
}

#[test]
fn draw_above_epsilon_picks_a_random_legal_action() {
    let mut tabular = table(0.5);
    let here = Position::new(0, 0);
    tabular.set(here, here.step(Direction::West), 2.0);
    let legal = [Direction::North, Direction::East, Direction::West];
    let state = Snapshot::at(0, 0, &legal);

    let mut rng = StdRng::seed_from_u64(11);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        let action = choose_action_with_draw(&tabular, &Scripted, &state, 0.2, 0.9, &mut rng)
            .expect("legal actions exist");
        assert!(legal.contains(&action));
        seen.insert(action);
    }
    assert_eq!(seen.len(), legal.len());

    // ε = 0 explores on every positive draw.
    let mut rng = StdRng::seed_from_u64(12);
    let mut non_greedy = 0;
    for _ in 0..200 {
        if choose_action(&tabular, &Scripted, &state, 0.0, &mut rng) != Some(Direction::West) {
            non_greedy += 1;
        }
    }
    assert!(non_greedy > 0);
}

#[test]
fn shaped_reward_is_deterministic_and_ordered() {
    let rewards = RewardSchedule::default();

    let busy = Snapshot::at(2, 3, &ALL_MOVES)
        .with_food_here()
        .with_capsule_here()
        .with_entity_here()
        .with_entity_here();
    let first = rewards.reward(&Scripted, &busy);
    assert_eq!(first, 1.0 + 10.0 + 2.0 * 50.0);
    assert_eq!(rewards.reward(&Scripted, &busy.clone()), first);

    // Loss is checked before win.
    let both = Snapshot::at(0, 0, &[]).won().lost();
    assert_eq!(rewards.reward(&Scripted, &both), -1000.0);
    assert_eq!(
        rewards.reward(&Scripted, &Snapshot::at(0, 0, &[]).won()),
        1000.0
    );

    let food_only = Snapshot::at(2, 3, &ALL_MOVES).with_food_here();
    assert_eq!(rewards.reward(&Scripted, &food_only), 1.0);
    assert_eq!(
        rewards.reward(&Scripted, &food_only.clone().lost().with_capsule_here()),
        -1000.0
    );

    let mut elsewhere = Snapshot::at(2, 3, &ALL_MOVES);
    elsewhere.food.push(Position::new(2, 4));
    elsewhere.entities.push(Position::new(3, 3));
    assert_eq!(rewards.reward(&Scripted, &elsewhere), 0.0);
}

#[test]
fn zero_features_give_zero_value() {
    let mut approx = linear(Vec::new(), 0.5);
    let state = Snapshot::at(1, 1, &ALL_MOVES);
    let next = Snapshot::at(1, 2, &ALL_MOVES);

    approx.observe(
        &Scripted,
        Transition::new(&state, Direction::North, &next, 25.0),
    );
    for action in ALL_MOVES {
        assert_eq!(approx.value(&Scripted, &state, action), 0.0);
    }
    assert!(approx.weights().is_empty());
}

#[test]
fn weights_move_with_the_sign_of_delta_times_feature() {
    let state = Snapshot::at(1, 1, &ALL_MOVES);
    let terminal = Snapshot::at(1, 2, &[]).won();

    let mut approx = linear(vec![("up", 1.0), ("down", -2.0)], 0.5);
    approx.observe(
        &Scripted,
        Transition::new(&state, Direction::North, &terminal, 10.0),
    );

    // δ = 10 - 0; terminal next state contributes nothing.
    assert!(approx_eq(approx.weight("up"), 5.0));
    assert!(approx_eq(approx.weight("down"), -10.0));
    assert_eq!(approx.weight("never-seen"), 0.0);

    // Q(s, a) = 5 + 20 = 25 now overshoots a target of 0, so both weights back off.
    approx.observe(
        &Scripted,
        Transition::new(&state, Direction::North, &terminal, 0.0),
    );
    assert!(approx.weight("up") < 5.0);
    assert!(approx.weight("down") > -10.0);
}

#[test]
fn linear_update_bootstraps_from_discounted_next_state() {
    let state = Snapshot::at(1, 1, &ALL_MOVES);
    let next = Snapshot::at(1, 2, &ALL_MOVES);

    let mut approx = linear(vec![("bias", 1.0)], 0.5);
    approx.observe(&Scripted, Transition::new(&state, Direction::North, &next, 2.0));
    // w = 0.5 * (2 + 0.8 * 0 - 0)
    assert!(approx_eq(approx.weight("bias"), 1.0));

    approx.observe(&Scripted, Transition::new(&state, Direction::North, &next, 2.0));
    // δ = 2 + 0.8 * 1 - 1 = 1.8
    assert!(approx_eq(approx.weight("bias"), 1.9));
}

#[test]
fn tabular_update_from_empty_table() {
    let s0 = Snapshot::at(1, 1, &[Direction::North, Direction::East]).with_food_here();
    let s1 = Snapshot::at(1, 2, &ALL_MOVES);

    let mut agent = QLearningAgent::<Scripted>::new(Estimator::Tabular(table(0.5)), 0.05, 1);
    let expected = {
        let Estimator::Tabular(before) = agent.estimator() else {
            panic!("expected a tabular estimator");
        };
        let reward = RewardSchedule::default().reward(&Scripted, &s0);
        0.5 * (reward + before.best_value(&Scripted, &s0) - 0.0)
    };
    assert_eq!(expected, 0.5);

    agent.observe_transition(&Scripted, &s0, Direction::North, &s1, 5.0);

    let Estimator::Tabular(after) = agent.estimator() else {
        panic!("expected a tabular estimator");
    };
    assert!(approx_eq(
        after.get(Position::new(1, 1), Position::new(1, 2)),
        expected
    ));
    assert_eq!(after.size(), 1);
}

#[test]
fn tabular_update_replaces_rather_than_accumulates() {
    let here = Position::new(1, 1);
    let up = Position::new(1, 2);
    let mut tabular = table(0.5);
    tabular.set(here, up, 6.0);
    tabular.set(here, Position::new(2, 1), 4.0);

    let s0 = Snapshot::at(1, 1, &[Direction::North, Direction::East]).with_food_here();
    let s1 = Snapshot::at(1, 2, &ALL_MOVES);
    tabular.observe(&Scripted, Transition::new(&s0, Direction::North, &s1, 100.0));

    // bestValue(s0) = max(6, 4) read before the write; R(s0) = 1.
    assert!(approx_eq(tabular.get(here, up), 0.5 * (1.0 + 6.0 - 6.0)));
}

#[test]
fn successor_bootstrap_reads_the_next_state() {
    let mut tabular = QTable::new(0.5, Bootstrap::Successor, RewardSchedule::default());
    let s0 = Snapshot::at(1, 1, &[Direction::North]);
    let s1 = Snapshot::at(1, 2, &[Direction::East]).with_capsule_here();
    tabular.set(Position::new(1, 2), Position::new(2, 2), 8.0);

    tabular.observe(&Scripted, Transition::new(&s0, Direction::North, &s1, -1.0));

    // R(s1) = 10, bestValue(s1) = 8
    assert!(approx_eq(
        tabular.get(Position::new(1, 1), Position::new(1, 2)),
        0.5 * (10.0 + 8.0)
    ));
}

#[test]
fn agent_reports_weights_once_and_freezes_after_training() {
    let estimator = Estimator::Linear(linear(vec![("bias", 1.0)], 0.5));
    let mut agent = QLearningAgent::new(estimator, 0.5, 2).with_seed(9);
    let state = Snapshot::at(1, 1, &ALL_MOVES);
    let next = Snapshot::at(1, 2, &ALL_MOVES);

    assert!(agent.is_in_training());
    agent.start_episode();
    agent.observe_transition(&Scripted, &state, Direction::North, &next, 2.0);
    assert_eq!(agent.episode_rewards(), 2.0);
    assert_eq!(agent.final_episode(), None);

    agent.start_episode();
    agent.observe_transition(&Scripted, &state, Direction::North, &next, 4.0);
    let weights = agent.final_episode().expect("weights after the last training episode");
    assert!(weights.contains_key("bias"));
    assert!(agent.is_in_testing());
    assert!(approx_eq(agent.average_training_reward(), 3.0));

    let frozen = agent.estimator().sorted_weights();
    agent.start_episode();
    agent.observe_transition(&Scripted, &state, Direction::North, &next, 50.0);
    assert_eq!(agent.estimator().sorted_weights(), frozen);
    assert_eq!(agent.final_episode(), None);
    assert!(approx_eq(agent.average_test_reward(), 50.0));
    assert_eq!(agent.episodes_so_far(), 3);
}

#[test]
fn tabular_agent_never_reports_weights() {
    let mut agent = QLearningAgent::<Scripted>::new(Estimator::Tabular(table(0.5)), 0.5, 1);
    agent.start_episode();
    assert_eq!(agent.final_episode(), None);
    assert!(agent.is_in_testing());
}

#[test]
fn agent_is_greedy_once_training_is_over() {
    let mut tabular = table(0.5);
    let here = Position::new(3, 3);
    tabular.set(here, here.step(Direction::South), 1.5);
    let mut agent = QLearningAgent::<Scripted>::new(Estimator::Tabular(tabular), 0.0, 0)
        .with_seed(5);
    let state = Snapshot::at(3, 3, &ALL_MOVES);

    for _ in 0..100 {
        assert_eq!(agent.get_action(&Scripted, &state), Some(Direction::South));
    }
    assert_eq!(agent.get_action(&Scripted, &Snapshot::at(3, 3, &[])), None);
}

#[test]
fn reset_forgets_learning() {
    let mut agent = QLearningAgent::<Scripted>::new(Estimator::Tabular(table(0.5)), 0.5, 3);
    let s0 = Snapshot::at(1, 1, &[Direction::North]).with_food_here();
    let s1 = Snapshot::at(1, 2, &[]);
    agent.observe_transition(&Scripted, &s0, Direction::North, &s1, 1.0);
    agent.final_episode();
    assert_eq!(agent.estimator().size(), 1);

    agent.reset();
    assert_eq!(agent.estimator().size(), 0);
    assert_eq!(agent.episodes_so_far(), 0);
    assert!(agent.is_in_training());
}
