use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::{
    db::{careerdb::CareerExt, userdb::UserExt},
    models::careermodels::ProjectStatus,
    AppState,
};

const SYNC_INTERVAL_SECS: u64 = 3600;

/// Compares the stored counters against the freshly derived ones.
/// Returns (projects_changed, earnings_changed).
fn profile_drift(
    stored_projects: i32,
    stored_earnings: &bigdecimal::BigDecimal,
    derived_projects: i64,
    derived_earnings: &bigdecimal::BigDecimal,
) -> (bool, bool) {
    (
        derived_projects as i32 != stored_projects,
        derived_earnings != stored_earnings,
    )
}

/// Re-derives the denormalized profile counters from the source tables.
/// View and offer counters are updated inline by the handlers; this job
/// corrects whatever drift those increments accumulate.
pub async fn sync_profile_stats(app_state: &AppState) -> Result<usize, sqlx::Error> {
    let profiles = app_state.db_client.get_all_freelancer_profiles().await?;
    let mut synced = 0;

    for profile in profiles {
        let total_projects = app_state
            .db_client
            .count_projects_for_profile(profile.user_id, Some(ProjectStatus::Completed))
            .await?;

        let total_earnings = app_state
            .db_client
            .accepted_offer_total(profile.user_id)
            .await?;

        let (projects_changed, earnings_changed) = profile_drift(
            profile.total_projects,
            &profile.total_earnings,
            total_projects,
            &total_earnings,
        );

        if projects_changed || earnings_changed {
            app_state
                .db_client
                .update_profile_stats(
                    profile.id,
                    total_projects as i32,
                    earnings_changed.then_some(total_earnings),
                )
                .await?;
            synced += 1;
        }
    }

    Ok(synced)
}

pub async fn start_stats_sync_job(app_state: Arc<AppState>) {
    let mut ticker = interval(Duration::from_secs(SYNC_INTERVAL_SECS));

    loop {
        ticker.tick().await;

        match sync_profile_stats(&app_state).await {
            Ok(0) => tracing::debug!("Profile stats sync: nothing to correct"),
            Ok(count) => tracing::info!("Profile stats sync corrected {} profiles", count),
            Err(e) => tracing::error!("Profile stats sync failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::profile_drift;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn drift_detected_when_counters_diverge() {
        let (projects, earnings) = profile_drift(3, &dec("1200.00"), 5, &dec("1200.00"));
        assert!(projects);
        assert!(!earnings);

        let (projects, earnings) = profile_drift(5, &dec("1200.00"), 5, &dec("1450.50"));
        assert!(!projects);
        assert!(earnings);
    }

    #[test]
    fn no_drift_when_counters_match() {
        let (projects, earnings) = profile_drift(5, &dec("1200.00"), 5, &dec("1200.00"));
        assert!(!projects);
        assert!(!earnings);
    }

    #[test]
    fn zero_profiles_compare_clean() {
        let (projects, earnings) = profile_drift(0, &dec("0"), 0, &dec("0"));
        assert!(!projects);
        assert!(!earnings);
    }
}
