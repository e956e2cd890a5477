//! Notification decorator
//!
//! Wraps any registry and publishes one [`WarpEvent`] after each successful
//! mutation. Publication is fire-and-forget on a broadcast channel; a send
//! with no live subscribers is not an error, and nothing in the registry
//! depends on what subscribers do with an event.

use crate::error::Result;
use crate::registry::WarpRegistry;
use tokio::sync::broadcast;
use waygate_types::{
    Invitation, InvitationChange, PlayerId, Position, Rotation, Warp, WarpEvent, WarpField,
    WarpKind, WorldId,
};

/// Registry wrapper that publishes mutation events
pub struct EventfulWarpRegistry<R> {
    inner: R,
    events: broadcast::Sender<WarpEvent>,
}

impl<R: WarpRegistry> EventfulWarpRegistry<R> {
    pub fn new(inner: R, events: broadcast::Sender<WarpEvent>) -> Self {
        Self { inner, events }
    }

    /// Unwrap, e.g. to reach a durability layer's shutdown.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Subscribe to mutation events.
    pub fn subscribe(&self) -> broadcast::Receiver<WarpEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: WarpEvent) {
        // Ignore errors if no receivers.
        let _ = self.events.send(event);
    }

    fn publish_update(&self, name: &str, field: WarpField) {
        if let Some(warp) = self.inner.get(name) {
            self.publish(WarpEvent::Updated {
                field,
                warp: warp.clone(),
            });
        }
    }
}

impl<R: WarpRegistry> WarpRegistry for EventfulWarpRegistry<R> {
    fn add(&mut self, warp: Warp) -> Result<()> {
        let snapshot = warp.clone();
        self.inner.add(warp)?;
        self.publish(WarpEvent::Added { warp: snapshot });
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Option<Warp> {
        let removed = self.inner.remove(name);
        if let Some(warp) = &removed {
            self.publish(WarpEvent::Removed { warp: warp.clone() });
        }
        removed
    }

    fn get(&self, name: &str) -> Option<&Warp> {
        self.inner.get(name)
    }

    fn query(&self, predicate: &dyn Fn(&Warp) -> bool) -> Vec<&Warp> {
        self.inner.query(predicate)
    }

    fn count(&self, predicate: &dyn Fn(&Warp) -> bool) -> usize {
        self.inner.count(predicate)
    }

    fn populate(&mut self, batch: Vec<Warp>) -> Result<()> {
        // Reload plumbing; subscribers are not told about each warp again.
        self.inner.populate(batch)
    }

    fn depopulate(&mut self) {
        self.inner.depopulate();
    }

    fn update_location(
        &mut self,
        name: &str,
        world: WorldId,
        position: Position,
        rotation: Rotation,
    ) -> Result<()> {
        self.inner.update_location(name, world, position, rotation)?;
        self.publish_update(name, WarpField::Location);
        Ok(())
    }

    fn update_kind(&mut self, name: &str, kind: WarpKind) -> Result<()> {
        self.inner.update_kind(name, kind)?;
        self.publish_update(name, WarpField::Kind);
        Ok(())
    }

    fn update_creator(&mut self, name: &str, creator: PlayerId) -> Result<()> {
        self.inner.update_creator(name, creator)?;
        self.publish_update(name, WarpField::Creator);
        Ok(())
    }

    fn update_welcome_message(&mut self, name: &str, message: String) -> Result<()> {
        self.inner.update_welcome_message(name, message)?;
        self.publish_update(name, WarpField::WelcomeMessage);
        Ok(())
    }

    fn record_visit(&mut self, name: &str) -> Result<()> {
        self.inner.record_visit(name)?;
        self.publish_update(name, WarpField::Visits);
        Ok(())
    }

    fn invite(&mut self, name: &str, invitation: Invitation) -> Result<()> {
        self.inner.invite(name, invitation.clone())?;
        if let Some(warp) = self.inner.get(name) {
            self.publish(WarpEvent::InvitationChanged {
                change: InvitationChange::Added,
                invitation,
                warp: warp.clone(),
            });
        }
        Ok(())
    }

    fn uninvite(&mut self, name: &str, invitation: Invitation) -> Result<()> {
        self.inner.uninvite(name, invitation.clone())?;
        if let Some(warp) = self.inner.get(name) {
            self.publish(WarpEvent::InvitationChanged {
                change: InvitationChange::Removed,
                invitation,
                warp: warp.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWarpRegistry;
    use tokio::sync::broadcast::error::TryRecvError;
    use waygate_types::WarpBuilder;

    fn warp(name: &str) -> Warp {
        WarpBuilder::new(
            name,
            PlayerId::generate(),
            WarpKind::Public,
            WorldId::generate(),
            Position::new(0.0, 64.0, 0.0),
            Rotation::new(0.0, 0.0),
        )
        .build()
    }

    fn stack() -> (
        EventfulWarpRegistry<MemoryWarpRegistry>,
        broadcast::Receiver<WarpEvent>,
    ) {
        let (tx, rx) = broadcast::channel(64);
        (EventfulWarpRegistry::new(MemoryWarpRegistry::new(), tx), rx)
    }

    #[test]
    fn every_mutation_publishes_exactly_one_event() {
        let (mut registry, mut rx) = stack();
        let invitation = Invitation::Group("mods".to_string());

        registry.add(warp("spawn")).unwrap();
        registry.update_kind("spawn", WarpKind::Private).unwrap();
        registry.record_visit("spawn").unwrap();
        registry.invite("spawn", invitation.clone()).unwrap();
        registry.uninvite("spawn", invitation).unwrap();
        registry.remove("spawn").unwrap();

        assert!(matches!(rx.try_recv().unwrap(), WarpEvent::Added { .. }));
        assert!(matches!(
            rx.try_recv().unwrap(),
            WarpEvent::Updated {
                field: WarpField::Kind,
                ..
            }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            WarpEvent::Updated {
                field: WarpField::Visits,
                ..
            }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            WarpEvent::InvitationChanged {
                change: InvitationChange::Added,
                ..
            }
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            WarpEvent::InvitationChanged {
                change: InvitationChange::Removed,
                ..
            }
        ));
        assert!(matches!(rx.try_recv().unwrap(), WarpEvent::Removed { .. }));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn update_events_carry_the_new_state() {
        let (mut registry, mut rx) = stack();
        registry.add(warp("spawn")).unwrap();
        let _ = rx.try_recv();

        registry
            .update_welcome_message("spawn", "hi there".to_string())
            .unwrap();

        match rx.try_recv().unwrap() {
            WarpEvent::Updated {
                field: WarpField::WelcomeMessage,
                warp,
            } => assert_eq!(warp.welcome_message, "hi there"),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn failed_mutations_publish_nothing() {
        let (mut registry, mut rx) = stack();
        registry.add(warp("spawn")).unwrap();
        let _ = rx.try_recv();

        registry.add(warp("spawn")).unwrap_err();
        registry.record_visit("ghost").unwrap_err();
        assert!(registry.remove("ghost").is_none());

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn populate_and_depopulate_are_silent() {
        let (mut registry, mut rx) = stack();

        registry.populate(vec![warp("a"), warp("b")]).unwrap();
        registry.depopulate();

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let (tx, rx) = broadcast::channel(4);
        drop(rx);
        let mut registry = EventfulWarpRegistry::new(MemoryWarpRegistry::new(), tx);

        registry.add(warp("spawn")).unwrap();
        assert!(registry.contains("spawn"));
    }
}
