use focus_board::{
    stats::summary,
    timer::{SessionKind, BREAK_MINUTES},
    run_session, AppError, AppState, Clock, Day, FixedClock, FocusTimer, Store,
};
use std::{sync::Arc, time::Duration};

async fn shared_store(dir: &tempfile::TempDir) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(Day::from_ymd(2026, 1, 5).unwrap()));
    let store = Store::load(dir.path().join("state.json"), clock).await.unwrap();
    AppState::new(store)
}

#[tokio::test(start_paused = true)]
async fn work_countdown_credits_every_second() {
    let dir = tempfile::tempdir().unwrap();
    let state = shared_store(&dir).await;
    let (task_id, before_total, before_today) = {
        let store = state.store.lock().await;
        (store.tasks()[0].id.clone(), store.user().total_time, store.today_seconds())
    };
    let before_task = state.store.lock().await.tasks()[0].time_spent;

    let mut timer = FocusTimer::new();
    timer.set_preset(1);
    timer.select_task(Some(task_id.clone()));
    let report = run_session(&state, &mut timer, std::future::pending()).await.unwrap();

    assert!(report.completed);
    assert_eq!(report.credited_seconds, 60);
    assert_eq!(timer.session(), SessionKind::Break);
    assert_eq!(timer.seconds(), BREAK_MINUTES * 60);
    assert!(!timer.is_running());

    let store = state.store.lock().await;
    assert_eq!(store.user().total_time, before_total + 60);
    assert_eq!(store.today_seconds(), before_today + 60);
    assert_eq!(store.find_task(&task_id).unwrap().time_spent, before_task + 60);
    assert_eq!(summary(&store).today_seconds, before_today + 60);
}

#[tokio::test(start_paused = true)]
async fn break_session_credits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let state = shared_store(&dir).await;
    let before = state.store.lock().await.today_seconds();

    let mut timer = FocusTimer::new();
    timer.set_preset(1);
    run_session(&state, &mut timer, std::future::pending()).await.unwrap();
    assert_eq!(timer.session(), SessionKind::Break);

    let report = run_session(&state, &mut timer, std::future::pending()).await.unwrap();
    assert!(report.completed);
    assert_eq!(report.credited_seconds, 0);
    assert_eq!(timer.session(), SessionKind::Work);
    assert_eq!(state.store.lock().await.today_seconds(), before + 60);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_a_count_up_session() {
    let dir = tempfile::tempdir().unwrap();
    let state = shared_store(&dir).await;
    let before = state.store.lock().await.today_seconds();

    let mut timer = FocusTimer::new();
    let shutdown = tokio::time::sleep(Duration::from_millis(10_500));
    let report = run_session(&state, &mut timer, shutdown).await.unwrap();

    assert!(!report.completed);
    assert!(!timer.is_running());
    assert_eq!(report.credited_seconds, timer.seconds());
    assert_eq!(state.store.lock().await.today_seconds(), before + report.credited_seconds);

    timer.stop();
    assert!(!timer.is_running());
}

#[tokio::test(start_paused = true)]
async fn store_write_failure_stops_the_timer() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(Day::from_ymd(2026, 1, 5).unwrap()));
    let store = Store::load(blocker.join("state.json"), clock).await.unwrap();
    let state = AppState::new(store);

    let mut timer = FocusTimer::new();
    timer.set_preset(1);
    let err = run_session(&state, &mut timer, std::future::pending()).await.unwrap_err();

    assert!(matches!(err, AppError::Io(_)));
    assert!(!timer.is_running());
}
