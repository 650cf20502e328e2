//! Integration tests for the rules engine.
//!
//! Exercises the full workflow from activity events to XP, currency, and
//! level state, including multi-level jumps, the engagement cap, and the
//! lazy weekly reset across simulated days.

use chrono::{DateTime, Duration, TimeZone, Utc};
use habitquest_core::{
    ActivityType, Clock, CoreError, Currency, Database, EffortLevel, EngineConfig, RewardType,
    RewardsEngine,
};

// 2026-03-01 09:00 UTC is 14:30 in the +05:30 application offset, so the
// application day matches the UTC date.
fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn fixed_engine(at: DateTime<Utc>) -> RewardsEngine {
    RewardsEngine::with_database(Database::open_memory().unwrap(), EngineConfig::default())
        .unwrap()
        .with_clock(Clock::system().fixed_at(at))
}

#[test]
fn test_quest_day_end_to_end() {
    let engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();

    // One habit completion: +10 XP, +10 engagement coins (cap 75).
    let outcome = engine
        .on_habit_completed("u1", "water", Some("Drink water"), EffortLevel::Moderate)
        .unwrap();
    assert!(outcome.applied);
    assert_eq!(outcome.engagement_balance, Some(10));

    let profile = engine.profile("u1").unwrap();
    assert_eq!(profile.level, 1);
    assert_eq!(profile.current_xp, 10);
    assert_eq!(profile.total_xp, 10);
    assert_eq!(profile.engagement_coins, 10);

    // Claiming the daily-login quest adds +5 coins and +5 XP.
    engine
        .claim("u1", RewardType::Quest, "daily_login")
        .unwrap();
    let profile = engine.profile("u1").unwrap();
    assert_eq!(profile.engagement_coins, 15);
    assert_eq!(profile.current_xp, 15);
    assert_eq!(profile.total_xp, 15);
    assert_eq!(profile.level, 1);

    let info = engine.level_info("u1").unwrap();
    assert_eq!(info.level, 1);
    assert_eq!(info.xp_needed, 100);
    assert!((info.progress_percent - 15.0).abs() < 1e-9);
}

#[test]
fn test_multi_level_jump_preserves_xp() {
    let engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();

    // Levels 1..=3 cost 100 + 105 + 111 = 316 XP; 350 lands in level 4
    // with 34 left over.
    let grant = engine.grant_xp("u1", 350, Some("migration backfill")).unwrap();
    assert!(grant.leveled_up);
    assert_eq!(grant.new_level, 4);

    let info = engine.level_info("u1").unwrap();
    assert_eq!(info.level, 4);
    assert_eq!(info.current_xp, 34);
    assert_eq!(info.total_xp, 350);
    assert_eq!(info.xp_needed, 118);
}

#[test]
fn test_grants_are_order_independent_for_total_xp() {
    let a = fixed_engine(base_time());
    a.create_profile("u1").unwrap();
    a.grant_xp("u1", 130, None).unwrap();
    a.grant_xp("u1", 220, None).unwrap();

    let b = fixed_engine(base_time());
    b.create_profile("u1").unwrap();
    b.grant_xp("u1", 220, None).unwrap();
    b.grant_xp("u1", 130, None).unwrap();

    let pa = a.profile("u1").unwrap();
    let pb = b.profile("u1").unwrap();
    assert_eq!(pa.total_xp, pb.total_xp);
    assert_eq!(pa.level, pb.level);
    assert_eq!(pa.current_xp, pb.current_xp);
}

#[test]
fn test_engagement_cap_truncates_silently() {
    let engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();

    let balance = engine.credit("u1", Currency::Engagement, 200).unwrap();
    assert_eq!(balance, 75);

    // Crediting at the cap still succeeds, as a no-op on balance.
    let balance = engine.credit("u1", Currency::Engagement, 10).unwrap();
    assert_eq!(balance, 75);

    let wallet = engine.wallet_balances("u1").unwrap();
    assert_eq!(wallet.engagement_coins, 75);
    assert_eq!(wallet.engagement_cap, 75);
}

#[test]
fn test_weekly_reset_applies_at_next_earn() {
    let engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();
    engine.credit("u1", Currency::Engagement, 50).unwrap();

    // Eight days later the next earn resets first, then credits.
    let engine = engine.with_clock(Clock::system().fixed_at(base_time() + Duration::days(8)));
    let outcome = engine
        .on_habit_completed("u1", "water", None, EffortLevel::Moderate)
        .unwrap();
    assert_eq!(outcome.engagement_balance, Some(10));

    let wallet = engine.wallet_balances("u1").unwrap();
    assert_eq!(wallet.engagement_coins, 10);
}

#[test]
fn test_debit_failure_leaves_state_unchanged() {
    let engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();
    engine.credit_purchase("u1", 20).unwrap();

    let err = engine.debit("u1", Currency::Premium, 50).unwrap_err();
    match err {
        CoreError::InsufficientFunds {
            currency,
            balance,
            requested,
        } => {
            assert_eq!(currency, "premium");
            assert_eq!(balance, 20);
            assert_eq!(requested, 50);
        }
        other => panic!("expected InsufficientFunds, got {other:?}"),
    }
    assert_eq!(engine.wallet_balances("u1").unwrap().premium_coins, 20);
}

#[test]
fn test_streak_builds_and_breaks_across_days() {
    let mut engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();

    for day in 0..3 {
        engine = engine
            .with_clock(Clock::system().fixed_at(base_time() + Duration::days(day)));
        engine
            .on_habit_completed("u1", "water", None, EffortLevel::Light)
            .unwrap();
    }
    assert_eq!(engine.get_streak("u1").unwrap().best, 3);

    // A skipped day drops the streak to zero without touching history.
    engine = engine.with_clock(Clock::system().fixed_at(base_time() + Duration::days(4)));
    assert_eq!(engine.get_streak("u1").unwrap().best, 0);
    assert_eq!(engine.user_stats("u1").unwrap().total_completions, 3);

    // Completing again starts over at one.
    engine
        .on_habit_completed("u1", "water", None, EffortLevel::Light)
        .unwrap();
    assert_eq!(engine.get_streak("u1").unwrap().best, 1);
}

#[test]
fn test_best_streak_is_max_over_habits() {
    let mut engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();

    // "water" on days 0-2, "run" only on day 2: best is water's 3, not a
    // union or intersection.
    for day in 0..3 {
        engine = engine
            .with_clock(Clock::system().fixed_at(base_time() + Duration::days(day)));
        engine
            .on_habit_completed("u1", "water", None, EffortLevel::Moderate)
            .unwrap();
    }
    engine
        .on_habit_completed("u1", "run", None, EffortLevel::Moderate)
        .unwrap();

    let streak = engine.get_streak("u1").unwrap();
    assert_eq!(streak.per_habit["water"], 3);
    assert_eq!(streak.per_habit["run"], 1);
    assert_eq!(streak.best, 3);
}

#[test]
fn test_xp_history_tags_activities() {
    let engine = fixed_engine(base_time());
    engine.create_profile("u1").unwrap();

    engine
        .on_habit_completed("u1", "water", None, EffortLevel::Intense)
        .unwrap();
    engine.on_community_post("u1").unwrap();
    engine.claim("u1", RewardType::Quest, "habit_done").unwrap();

    let history = engine.xp_history("u1", 10).unwrap();
    assert_eq!(history.len(), 3);
    // Newest first.
    assert_eq!(history[0].activity_type, ActivityType::Quest);
    assert_eq!(history[0].activity_id.as_deref(), Some("habit_done"));
    assert_eq!(history[1].activity_type, ActivityType::Community);
    assert_eq!(history[2].activity_type, ActivityType::Habit);
    assert_eq!(history[2].amount, 15);
}
