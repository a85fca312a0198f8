use cadence_core::{Coach, CoachBuilder};
use jiff::civil::date;
use tempfile::TempDir;

/// Helper function to create a test coach whose "today" is 2024-06-01
pub async fn create_test_coach() -> (TempDir, Coach) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let coach = CoachBuilder::new()
        .with_database_path(Some(&db_path))
        .with_today(date(2024, 6, 1))
        .build()
        .await
        .expect("Failed to create coach");
    (temp_dir, coach)
}
