//! The aggregation use case.
//!
//! Derives a scope for the call, fetches the profile and the orders in
//! parallel under it, and combines both results once the two fetches have
//! terminated. The first failing fetch cancels the other one.

use std::sync::Arc;

use tracing::instrument::WithSubscriber;
use tracing::{Instrument, info, info_span, warn};
use useragg_core::error::{AggregateError, Branch, LookupError, ScopeError};
use useragg_core::join::{JoinBarrier, Slot};
use useragg_core::lookup::{OrderLookup, ProfileLookup};
use useragg_core::model::{AggregatedProfile, Order, Profile, UserId};
use useragg_core::scope::{Scope, derive_scope};
use uuid::Uuid;

use crate::application::config::AggregatorConfig;
use crate::domain::combine::combine;

/// Why one of the two fetches gave up.
#[derive(Debug)]
enum BranchFailure {
    Lookup { branch: Branch, cause: LookupError },
    ProfileMissing(UserId),
}

/// Aggregates a user's profile with their orders.
pub struct UserAggregator {
    profiles: Arc<dyn ProfileLookup>,
    orders: Arc<dyn OrderLookup>,
    config: AggregatorConfig,
}

impl std::fmt::Debug for UserAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAggregator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UserAggregator {
    /// Creates an aggregator over the given sources.
    #[must_use]
    pub fn new(
        profiles: Arc<dyn ProfileLookup>,
        orders: Arc<dyn OrderLookup>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            profiles,
            orders,
            config,
        }
    }

    /// The configuration this aggregator was built with.
    #[must_use]
    pub const fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Fetches the profile and orders of `user_id` concurrently and returns
    /// one line per order the user owns, in order-source sequence.
    ///
    /// Never returns before both fetches have terminated.
    ///
    /// # Errors
    ///
    /// - `AggregateError::ProfileNotFound` if the profile source has no such
    ///   user.
    /// - `AggregateError::Upstream` if either source reported an error.
    /// - `AggregateError::DeadlineExceeded` if the configured timeout elapsed.
    /// - `AggregateError::Cancelled` if `parent` was cancelled or expired.
    /// - `AggregateError::Incomplete` if a fetch reported success but left no
    ///   result behind.
    pub async fn aggregate(
        &self,
        parent: &Scope,
        user_id: UserId,
    ) -> Result<Vec<AggregatedProfile>, AggregateError> {
        match &self.config.diagnostics {
            Some(dispatch) => {
                self.traced(parent, user_id)
                    .with_subscriber(dispatch.clone())
                    .await
            }
            None => self.traced(parent, user_id).await,
        }
    }

    async fn traced(
        &self,
        parent: &Scope,
        user_id: UserId,
    ) -> Result<Vec<AggregatedProfile>, AggregateError> {
        let span = info_span!(
            "aggregate",
            user_id = user_id.0,
            aggregation_id = %Uuid::new_v4(),
        );
        self.execute(parent, user_id).instrument(span).await
    }

    async fn execute(
        &self,
        parent: &Scope,
        user_id: UserId,
    ) -> Result<Vec<AggregatedProfile>, AggregateError> {
        info!(user_id = user_id.0, "starting aggregation");

        let scope = derive_scope(parent, self.config.effective_timeout());
        let profile_slot = Slot::new();
        let orders_slot = Slot::new();

        let mut barrier = JoinBarrier::new(&scope);
        let lookup = Arc::clone(&self.profiles);
        let out = profile_slot.clone();
        barrier.spawn(move |scope| {
            fetch_profile(lookup, scope, user_id, out)
                .in_current_span()
                .with_current_subscriber()
        });
        let lookup = Arc::clone(&self.orders);
        let out = orders_slot.clone();
        barrier.spawn(move |scope| {
            fetch_orders(lookup, scope, user_id, out)
                .in_current_span()
                .with_current_subscriber()
        });

        let joined = barrier.wait().await;
        let deadline_is_own = scope.deadline_is_own();
        scope.release();

        let collected = joined
            .map_err(|failure| classify(failure, deadline_is_own))
            .and_then(|()| take_results(profile_slot, orders_slot));
        let (profile, orders) = match collected {
            Ok(results) => results,
            Err(err) => {
                warn!(user_id = user_id.0, error = %err, "aggregator exited with error");
                return Err(err);
            }
        };
        let lines = combine(&profile, &orders);
        info!(
            user_id = user_id.0,
            count = lines.len(),
            "aggregation complete successfully"
        );
        Ok(lines)
    }
}

async fn fetch_profile(
    lookup: Arc<dyn ProfileLookup>,
    scope: Scope,
    user_id: UserId,
    out: Slot<Profile>,
) -> Result<(), BranchFailure> {
    match scope.run(lookup.fetch(&scope, user_id)).await {
        Ok(Some(profile)) => {
            out.fill(profile);
            Ok(())
        }
        Ok(None) => {
            warn!(user_id = user_id.0, branch = "profile", "profile not found");
            Err(BranchFailure::ProfileMissing(user_id))
        }
        Err(cause) => {
            warn!(user_id = user_id.0, branch = "profile", error = %cause, "failed to fetch profile");
            Err(BranchFailure::Lookup {
                branch: Branch::Profile,
                cause,
            })
        }
    }
}

async fn fetch_orders(
    lookup: Arc<dyn OrderLookup>,
    scope: Scope,
    user_id: UserId,
    out: Slot<Vec<Order>>,
) -> Result<(), BranchFailure> {
    match scope.run(lookup.fetch_all(&scope, user_id)).await {
        Ok(orders) => {
            out.fill(orders);
            Ok(())
        }
        Err(cause) => {
            warn!(user_id = user_id.0, branch = "orders", error = %cause, "failed to fetch orders");
            Err(BranchFailure::Lookup {
                branch: Branch::Orders,
                cause,
            })
        }
    }
}

/// Maps the failure the barrier surfaced onto the caller-facing error.
///
/// A fetch cut short by its scope is a deadline miss when the scope expired
/// and the expiring deadline was the aggregator's own timeout. Anything else
/// that stopped the scope came from the caller.
fn classify(failure: BranchFailure, deadline_is_own: bool) -> AggregateError {
    match failure {
        BranchFailure::ProfileMissing(user_id) => AggregateError::ProfileNotFound(user_id),
        BranchFailure::Lookup {
            branch,
            cause: LookupError::Scope(reason),
        } => {
            if deadline_is_own && reason == ScopeError::DeadlineExceeded {
                AggregateError::DeadlineExceeded { branch }
            } else {
                AggregateError::Cancelled { branch }
            }
        }
        BranchFailure::Lookup { branch, cause } => AggregateError::Upstream {
            branch,
            source: cause,
        },
    }
}

/// Reads both slots once the barrier has joined.
fn take_results(
    profile: Slot<Profile>,
    orders: Slot<Vec<Order>>,
) -> Result<(Profile, Vec<Order>), AggregateError> {
    match (profile.take(), orders.take()) {
        (Some(profile), Some(orders)) => Ok((profile, orders)),
        (None, _) => Err(AggregateError::Incomplete {
            branch: Branch::Profile,
        }),
        (Some(_), None) => Err(AggregateError::Incomplete {
            branch: Branch::Orders,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;
    use useragg_core::error::{AggregateError, Branch, LookupError, ScopeError};
    use useragg_core::join::Slot;
    use useragg_core::lookup::{OrderLookup, ProfileLookup};
    use useragg_core::model::{AggregatedProfile, Order, Profile, UserId};
    use useragg_core::scope::{Scope, derive_scope};
    use useragg_test_support::{
        CapturedLogs, SimulatedOrderLookup, SimulatedProfileLookup, basic_profiles, orders,
    };

    use super::{BranchFailure, UserAggregator, classify, take_results};
    use crate::application::config::AggregatorConfig;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn profiles_after(latency: Duration) -> Arc<SimulatedProfileLookup> {
        Arc::new(SimulatedProfileLookup::new(latency, basic_profiles()))
    }

    fn orders_after(latency: Duration, rows: &[(i64, i64, f64)]) -> Arc<SimulatedOrderLookup> {
        Arc::new(SimulatedOrderLookup::new(latency, orders(rows)))
    }

    fn aggregator(
        profiles: Arc<SimulatedProfileLookup>,
        orders: Arc<SimulatedOrderLookup>,
        timeout: Option<Duration>,
    ) -> UserAggregator {
        UserAggregator::new(
            profiles,
            orders,
            AggregatorConfig {
                timeout,
                ..AggregatorConfig::default()
            },
        )
    }

    const THREE_ORDERS: &[(i64, i64, f64)] = &[(1, 1, 100.0), (2, 1, 20.6), (3, 3, 30.79)];

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_joins_profile_with_matching_orders() {
        // Arrange
        let aggregator = aggregator(
            profiles_after(ms(10)),
            orders_after(ms(20), THREE_ORDERS),
            Some(ms(100)),
        );

        // Act
        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        // Assert
        assert_eq!(
            result,
            Ok(vec![
                AggregatedProfile::new("Alice", 100.0),
                AggregatedProfile::new("Alice", 20.6),
            ])
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_with_single_matching_order() {
        let aggregator = aggregator(
            profiles_after(ms(10)),
            orders_after(ms(20), &[(1, 1, 100.0), (3, 3, 30.79)]),
            Some(ms(100)),
        );

        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        assert_eq!(result, Ok(vec![AggregatedProfile::new("Alice", 100.0)]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_without_matching_orders_returns_empty_list() {
        let aggregator = aggregator(
            profiles_after(ms(10)),
            orders_after(ms(20), &[(1, 2, 100.0), (3, 3, 30.79)]),
            Some(ms(100)),
        );

        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        assert_eq!(result, Ok(Vec::new()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_refilters_orders_of_other_users() {
        // Arrange
        let orders = Arc::new(SimulatedOrderLookup::unscoped(ms(5), orders(THREE_ORDERS)));
        let aggregator = aggregator(profiles_after(ms(5)), orders, None);

        // Act
        let result = aggregator.aggregate(&Scope::root(), UserId(3)).await;

        // Assert
        assert_eq!(result, Ok(vec![AggregatedProfile::new("Charlie", 30.79)]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_fails_when_orders_exceed_timeout() {
        let aggregator = aggregator(
            profiles_after(ms(10)),
            orders_after(ms(120), THREE_ORDERS),
            Some(ms(100)),
        );

        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        assert_eq!(
            result,
            Err(AggregateError::DeadlineExceeded {
                branch: Branch::Orders
            })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_fails_when_profile_exceeds_timeout() {
        let aggregator = aggregator(
            profiles_after(ms(120)),
            orders_after(ms(20), THREE_ORDERS),
            Some(ms(100)),
        );

        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        assert_eq!(
            result,
            Err(AggregateError::DeadlineExceeded {
                branch: Branch::Profile
            })
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_timeout_cuts_slow_branch_short() {
        // Arrange
        let aggregator = aggregator(
            profiles_after(ms(2_000)),
            orders_after(ms(10), THREE_ORDERS),
            Some(ms(50)),
        );
        let start = Instant::now();

        // Act
        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        // Assert
        assert!(matches!(
            result,
            Err(AggregateError::DeadlineExceeded {
                branch: Branch::Profile
            })
        ));
        let elapsed = start.elapsed();
        assert!(elapsed >= ms(50), "returned before the deadline: {elapsed:?}");
        assert!(elapsed < ms(1_000), "waited for the slow branch: {elapsed:?}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_without_timeout_waits_for_slow_branches() {
        let aggregator = aggregator(
            profiles_after(ms(120)),
            orders_after(ms(150), &[(1, 1, 100.0), (3, 1, 30.79)]),
            None,
        );

        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        assert_eq!(
            result,
            Ok(vec![
                AggregatedProfile::new("Alice", 100.0),
                AggregatedProfile::new("Alice", 30.79),
            ])
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_profile_error_cancels_order_fetch() {
        // Arrange
        let profiles = Arc::new(SimulatedProfileLookup::failing(ms(120)));
        let aggregator = aggregator(profiles, orders_after(ms(1_500), THREE_ORDERS), None);
        let start = Instant::now();

        // Act
        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        // Assert
        assert_eq!(
            result,
            Err(AggregateError::Upstream {
                branch: Branch::Profile,
                source: LookupError::Unavailable("simulated profile search error".into()),
            })
        );
        assert!(start.elapsed() < ms(1_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_profile_error_without_timeout() {
        let profiles = Arc::new(SimulatedProfileLookup::failing(ms(120)));
        let aggregator = aggregator(profiles, orders_after(ms(150), THREE_ORDERS), None);

        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        assert!(matches!(
            result,
            Err(AggregateError::Upstream {
                branch: Branch::Profile,
                ..
            })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_order_error_propagates() {
        let orders = Arc::new(SimulatedOrderLookup::failing(ms(10)));
        let aggregator = aggregator(profiles_after(ms(70)), orders, Some(ms(100)));

        let err = aggregator
            .aggregate(&Scope::root(), UserId(1))
            .await
            .unwrap_err();

        assert_eq!(err.branch(), Branch::Orders);
        assert_eq!(
            err.to_string(),
            "orders fetch failed: upstream unavailable: simulated orders search error"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_with_both_branches_failing_reports_one_upstream_error() {
        let aggregator = aggregator(
            Arc::new(SimulatedProfileLookup::failing(ms(120))),
            Arc::new(SimulatedOrderLookup::failing(ms(120))),
            None,
        );

        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        assert!(matches!(result, Err(AggregateError::Upstream { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_parent_deadline_returns_cancelled_early() {
        // Arrange
        let parent = derive_scope(&Scope::root(), Some(ms(100)));
        let aggregator = aggregator(
            profiles_after(ms(2_000)),
            orders_after(ms(10), THREE_ORDERS),
            Some(ms(500)),
        );
        let start = Instant::now();

        // Act
        let result = aggregator.aggregate(&parent, UserId(1)).await;

        // Assert
        assert_eq!(
            result,
            Err(AggregateError::Cancelled {
                branch: Branch::Profile
            })
        );
        assert!(start.elapsed() < ms(1_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_parent_deadline_without_own_timeout() {
        let parent = derive_scope(&Scope::root(), Some(ms(100)));
        let aggregator = aggregator(
            profiles_after(ms(200)),
            orders_after(ms(10), THREE_ORDERS),
            None,
        );
        let start = Instant::now();

        let result = aggregator.aggregate(&parent, UserId(1)).await;

        assert!(matches!(result, Err(AggregateError::Cancelled { .. })));
        assert!(start.elapsed() < ms(200));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_external_cancellation_returns_promptly() {
        // Arrange
        let parent = Scope::root();
        let aggregator = aggregator(
            profiles_after(ms(2_000)),
            orders_after(ms(2_000), THREE_ORDERS),
            None,
        );
        let canceller = parent.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ms(30)).await;
            canceller.cancel();
        });
        let start = Instant::now();

        // Act
        let result = aggregator.aggregate(&parent, UserId(1)).await;

        // Assert
        assert!(matches!(result, Err(AggregateError::Cancelled { .. })));
        assert!(start.elapsed() < ms(1_000));
    }

    #[tokio::test]
    async fn test_aggregate_on_cancelled_parent_fails_without_waiting() {
        let parent = Scope::root();
        parent.cancel();
        let aggregator = aggregator(
            profiles_after(ms(2_000)),
            orders_after(ms(2_000), THREE_ORDERS),
            None,
        );
        let start = Instant::now();

        let result = aggregator.aggregate(&parent, UserId(1)).await;

        assert!(matches!(result, Err(AggregateError::Cancelled { .. })));
        assert!(start.elapsed() < ms(1_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_failure_does_not_cancel_parent() {
        let parent = Scope::root();
        let aggregator = aggregator(
            profiles_after(ms(10)),
            Arc::new(SimulatedOrderLookup::failing(ms(5))),
            None,
        );

        let result = aggregator.aggregate(&parent, UserId(1)).await;

        assert!(result.is_err());
        assert!(!parent.is_done());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_missing_profile_is_not_found_and_stops_orders() {
        // Arrange
        let aggregator = aggregator(
            profiles_after(ms(10)),
            orders_after(ms(1_500), THREE_ORDERS),
            None,
        );
        let start = Instant::now();

        // Act
        let result = aggregator.aggregate(&Scope::root(), UserId(42)).await;

        // Assert
        assert_eq!(result, Err(AggregateError::ProfileNotFound(UserId(42))));
        assert!(start.elapsed() < ms(1_000));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_fetches_fresh_data_on_every_call() {
        // Arrange
        let profiles = profiles_after(ms(1));
        let orders = orders_after(ms(1), THREE_ORDERS);
        let aggregator = aggregator(Arc::clone(&profiles), Arc::clone(&orders), None);

        // Act
        let first = aggregator.aggregate(&Scope::root(), UserId(1)).await;
        let second = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        // Assert
        assert_eq!(first, second);
        assert_eq!(profiles.calls(), 2);
        assert_eq!(orders.calls(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_success_is_logged_with_user_id() {
        // Arrange
        let logs = CapturedLogs::new();
        let aggregator = UserAggregator::new(
            profiles_after(ms(10)),
            orders_after(ms(20), THREE_ORDERS),
            AggregatorConfig::default()
                .with_timeout(ms(100))
                .with_diagnostics(logs.dispatch()),
        );

        // Act
        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        // Assert
        assert!(result.is_ok());
        let output = logs.contents();
        assert!(output.contains("starting aggregation"), "{output}");
        assert!(output.contains("aggregation complete successfully"), "{output}");
        assert!(output.contains("user_id"), "{output}");
        assert!(output.contains("aggregation_id"), "{output}");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_aggregate_failure_is_logged_including_branch_event() {
        // Arrange
        let logs = CapturedLogs::new();
        let aggregator = UserAggregator::new(
            profiles_after(ms(10)),
            Arc::new(SimulatedOrderLookup::failing(ms(10))),
            AggregatorConfig::default().with_diagnostics(logs.dispatch()),
        );

        // Act
        let result = aggregator.aggregate(&Scope::root(), UserId(1)).await;

        // Assert
        assert!(result.is_err());
        let output = logs.contents();
        assert!(output.contains("failed to fetch orders"), "{output}");
        assert!(output.contains("aggregator exited with error"), "{output}");
        assert!(!output.contains("aggregation complete successfully"), "{output}");
    }

    /// Answers after `latency` without looking at its scope.
    struct StubbornProfiles {
        latency: Duration,
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ProfileLookup for StubbornProfiles {
        async fn fetch(&self, _scope: &Scope, id: UserId) -> Result<Option<Profile>, LookupError> {
            tokio::time::sleep(self.latency).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(Some(Profile::new(id, "Alice")))
        }
    }

    /// Blocks until its scope is done.
    struct WatchfulOrders {
        saw_release: Arc<AtomicBool>,
    }

    #[async_trait]
    impl OrderLookup for WatchfulOrders {
        async fn fetch_all(&self, scope: &Scope, _id: UserId) -> Result<Vec<Order>, LookupError> {
            let reason = scope.done().await;
            self.saw_release.store(true, Ordering::SeqCst);
            Err(LookupError::Scope(reason))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dropping_aggregate_future_aborts_both_fetches() {
        // Arrange
        let profile_finished = Arc::new(AtomicBool::new(false));
        let orders_saw_release = Arc::new(AtomicBool::new(false));
        let aggregator = UserAggregator::new(
            Arc::new(StubbornProfiles {
                latency: ms(300),
                finished: Arc::clone(&profile_finished),
            }),
            Arc::new(WatchfulOrders {
                saw_release: Arc::clone(&orders_saw_release),
            }),
            AggregatorConfig::default(),
        );
        let parent = Scope::root();

        // Act
        let outcome =
            tokio::time::timeout(ms(30), aggregator.aggregate(&parent, UserId(1))).await;
        tokio::time::sleep(ms(400)).await;

        // Assert
        assert!(outcome.is_err());
        assert!(!profile_finished.load(Ordering::SeqCst));
        assert!(!orders_saw_release.load(Ordering::SeqCst));
        assert!(!parent.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn test_own_deadline_wins_after_parent_deadline_also_passes() {
        // Arrange
        let parent = derive_scope(&Scope::root(), Some(ms(60)));
        let scope = derive_scope(&parent, Some(ms(50)));
        scope.done().await;
        tokio::time::advance(ms(20)).await;
        assert!(parent.is_done());

        // Act
        let err = classify(
            BranchFailure::Lookup {
                branch: Branch::Profile,
                cause: LookupError::Scope(ScopeError::DeadlineExceeded),
            },
            scope.deadline_is_own(),
        );

        // Assert
        assert_eq!(
            err,
            AggregateError::DeadlineExceeded {
                branch: Branch::Profile
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_inherited_deadline_is_classified_as_cancelled() {
        let parent = derive_scope(&Scope::root(), Some(ms(40)));
        let scope = derive_scope(&parent, Some(ms(50)));
        scope.done().await;

        let err = classify(
            BranchFailure::Lookup {
                branch: Branch::Orders,
                cause: LookupError::Scope(ScopeError::DeadlineExceeded),
            },
            scope.deadline_is_own(),
        );

        assert_eq!(
            err,
            AggregateError::Cancelled {
                branch: Branch::Orders
            }
        );
    }

    #[test]
    fn test_cancellation_before_own_deadline_is_classified_as_cancelled() {
        let err = classify(
            BranchFailure::Lookup {
                branch: Branch::Profile,
                cause: LookupError::Scope(ScopeError::Cancelled),
            },
            true,
        );

        assert_eq!(
            err,
            AggregateError::Cancelled {
                branch: Branch::Profile
            }
        );
    }

    #[test]
    fn test_take_results_reports_branch_with_missing_result() {
        // Arrange
        let profile = Slot::new();
        let orders: Slot<Vec<Order>> = Slot::new();
        let lingering = profile.clone();
        orders.clone().fill(Vec::new());

        // Act
        let result = take_results(profile, orders);

        // Assert
        assert!(matches!(
            result,
            Err(AggregateError::Incomplete {
                branch: Branch::Profile
            })
        ));
        drop(lingering);
    }

    #[test]
    fn test_take_results_returns_both_values() {
        let profile = Slot::new();
        let orders = Slot::new();
        profile.clone().fill(Profile::new(1, "Alice"));
        orders.clone().fill(vec![Order::new(1, 1, 100.0)]);

        let result = take_results(profile, orders);

        assert_eq!(
            result,
            Ok((Profile::new(1, "Alice"), vec![Order::new(1, 1, 100.0)]))
        );
    }
}
