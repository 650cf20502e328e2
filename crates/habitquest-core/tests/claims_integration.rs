//! Integration tests for claim exactly-once semantics.
//!
//! Day-scoped and permanent claims, the calendar-day scoping under the
//! application offset, and two database handles racing the same claim on
//! a shared file.

use std::thread;

use chrono::{DateTime, Duration, TimeZone, Utc};
use habitquest_core::{
    Clock, CoreError, Database, EngineConfig, RewardType, RewardsEngine,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

fn fixed_engine(db: Database, at: DateTime<Utc>) -> RewardsEngine {
    RewardsEngine::with_database(db, EngineConfig::default())
        .unwrap()
        .with_clock(Clock::system().fixed_at(at))
}

#[test]
fn test_quest_reclaimable_next_day_only() {
    let engine = fixed_engine(Database::open_memory().unwrap(), base_time());
    engine.create_profile("u1").unwrap();

    engine.claim("u1", RewardType::Quest, "daily_login").unwrap();
    let err = engine
        .claim("u1", RewardType::Quest, "daily_login")
        .unwrap_err();
    assert!(matches!(err, CoreError::AlreadyClaimed { .. }));

    // The following calendar day the same reward id opens up again.
    let engine = engine.with_clock(Clock::system().fixed_at(base_time() + Duration::days(1)));
    engine.claim("u1", RewardType::Quest, "daily_login").unwrap();
}

#[test]
fn test_claim_day_follows_application_offset() {
    let engine = fixed_engine(
        Database::open_memory().unwrap(),
        // 20:00 UTC on Mar 1 is already 01:30 on Mar 2 at +05:30.
        Utc.with_ymd_and_hms(2026, 3, 1, 20, 0, 0).unwrap(),
    );
    engine.create_profile("u1").unwrap();
    let claim = engine.claim("u1", RewardType::Quest, "daily_login").unwrap();
    assert_eq!(
        claim.claim_date,
        Some(chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap())
    );

    // Fourteen UTC hours later it is still the same application day, so
    // the claim stays closed even though the UTC date advanced.
    let engine = engine.with_clock(Clock::system().fixed_at(
        Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
    ));
    let err = engine
        .claim("u1", RewardType::Quest, "daily_login")
        .unwrap_err();
    assert!(matches!(err, CoreError::AlreadyClaimed { .. }));
}

#[test]
fn test_streak_milestone_day_scoped() {
    let engine = fixed_engine(Database::open_memory().unwrap(), base_time());
    engine.create_profile("u1").unwrap();

    engine.claim("u1", RewardType::Streak, "streak_3").unwrap();
    let err = engine
        .claim("u1", RewardType::Streak, "streak_3")
        .unwrap_err();
    assert!(matches!(err, CoreError::AlreadyClaimed { .. }));

    // A different milestone is an independent claim key.
    engine.claim("u1", RewardType::Streak, "streak_7").unwrap();

    let wallet = engine.wallet_balances("u1").unwrap();
    assert_eq!(wallet.achievement_coins, 15 + 35);
}

#[test]
fn test_achievement_claim_permanent_across_days() {
    let engine = fixed_engine(Database::open_memory().unwrap(), base_time());
    engine.create_profile("u1").unwrap();

    engine
        .claim("u1", RewardType::Achievement, "first_steps")
        .unwrap();

    // Unlike day-scoped rewards, a new day does not reopen it.
    let engine = engine.with_clock(Clock::system().fixed_at(base_time() + Duration::days(1)));
    let err = engine
        .claim("u1", RewardType::Achievement, "first_steps")
        .unwrap_err();
    assert!(matches!(err, CoreError::AlreadyClaimed { .. }));
}

#[test]
fn test_concurrent_quest_claims_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitquest.db");

    {
        let setup = fixed_engine(Database::open_at(&path).unwrap(), base_time());
        setup.create_profile("u1").unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..2 {
        let path = path.clone();
        handles.push(thread::spawn(move || {
            let engine = fixed_engine(Database::open_at(&path).unwrap(), base_time());
            engine.claim("u1", RewardType::Quest, "daily_login")
        }));
    }
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in &results {
        if let Err(e) = result {
            assert!(matches!(e, CoreError::AlreadyClaimed { .. }));
        }
    }

    // Exactly one credit landed on the shared profile.
    let check = fixed_engine(Database::open_at(&path).unwrap(), base_time());
    assert_eq!(check.wallet_balances("u1").unwrap().engagement_coins, 5);
    assert_eq!(check.profile("u1").unwrap().total_xp, 5);
}

#[test]
fn test_concurrent_achievement_claims_single_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("habitquest.db");

    {
        let setup = fixed_engine(Database::open_at(&path).unwrap(), base_time());
        setup.create_profile("u1").unwrap();
    }

    let mut handles = Vec::new();
    for _ in 0..2 {
        let path = path.clone();
        handles.push(thread::spawn(move || {
            let engine = fixed_engine(Database::open_at(&path).unwrap(), base_time());
            engine.claim("u1", RewardType::Achievement, "dear_diary")
        }));
    }
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    let check = fixed_engine(Database::open_at(&path).unwrap(), base_time());
    assert_eq!(check.wallet_balances("u1").unwrap().achievement_coins, 10);
}
