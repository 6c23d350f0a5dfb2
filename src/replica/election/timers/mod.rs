mod time;

#[cfg(test)]
mod test_utils;

pub(crate) use time::Clock;
pub(crate) use time::RealClock;

use crate::actor::WeakActorClient;
use tokio::time::{Duration, Instant};

/// The two waits of an election round.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum ElectionTimeout {
    /// Startup settle delay elapsed. Time to draw our priority and start gossiping it.
    Settled,
    /// We've accounted for every vessel and waited for in-flight death notices. Time to pick.
    Finalize,
}

/// `spawn_election_timer()` notifies the replica once, `delay` after now. The deadline is taken
/// before the task is spawned, so a slow spawn doesn't stretch the wait.
pub(crate) fn spawn_election_timer<C: Clock>(
    clock: C,
    delay: Duration,
    timeout: ElectionTimeout,
    actor_client: WeakActorClient,
) {
    let deadline = clock.now() + delay;
    tokio::task::spawn(run_election_timer(clock, deadline, timeout, actor_client));
}

async fn run_election_timer<C: Clock>(
    mut clock: C,
    deadline: Instant,
    timeout: ElectionTimeout,
    actor_client: WeakActorClient,
) {
    clock.sleep_until(deadline).await;
    // If the replica is gone, there's nobody left to elect.
    let _ = actor_client.election_timeout(timeout).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorClient;
    use super::test_utils::TestUtilActor;

    #[tokio::test]
    async fn settle_timer_fires_once_after_delay() {
        // -- setup --
        let settle_delay = Duration::from_millis(1000);
        let (strong_actor_client, rx) = ActorClient::new(10);
        let mut actor = TestUtilActor::new(rx);
        let (clock, mut clock_driver) = time::manual_clock();

        // -- execute & verify --
        spawn_election_timer(
            clock,
            settle_delay,
            ElectionTimeout::Settled,
            strong_actor_client.weak(),
        );
        actor.assert_no_event().await;

        clock_driver.advance(settle_delay / 2);
        actor.assert_no_event().await;

        clock_driver.advance(settle_delay / 2);
        actor.assert_election_timeout_event(ElectionTimeout::Settled).await;

        clock_driver.advance(settle_delay * 3);
        actor.assert_no_event().await;
    }

    #[tokio::test]
    async fn finalize_timer_is_independent_of_settle_timer() {
        let (strong_actor_client, rx) = ActorClient::new(10);
        let mut actor = TestUtilActor::new(rx);
        let (clock, mut clock_driver) = time::manual_clock();

        spawn_election_timer(
            clock.clone(),
            Duration::from_millis(100),
            ElectionTimeout::Settled,
            strong_actor_client.weak(),
        );
        spawn_election_timer(
            clock,
            Duration::from_millis(300),
            ElectionTimeout::Finalize,
            strong_actor_client.weak(),
        );

        clock_driver.advance(Duration::from_millis(150));
        actor.assert_election_timeout_event(ElectionTimeout::Settled).await;
        actor.assert_no_event().await;

        clock_driver.advance(Duration::from_millis(150));
        actor.assert_election_timeout_event(ElectionTimeout::Finalize).await;
    }
}
