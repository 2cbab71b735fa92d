//! # Session
//!
//! One cashier's interaction context. The session owns a cart in the
//! store's open-cart registry; dropping the session closes that cart and
//! releases every product it referenced.

use tracing::{debug, info};
use uuid::Uuid;

use duka_store::CartId;

use super::till::Till;

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    cart_id: CartId,
    till: Till,
}

impl Session {
    pub(crate) fn open(till: Till) -> Self {
        let cart_id = till.with_store_mut(|store| store.open_cart());
        let id = Uuid::new_v4();
        info!(session_id = %id, cart_id = %cart_id, "Session opened");

        Session { id, cart_id, till }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cart_id(&self) -> CartId {
        self.cart_id
    }

    pub fn till(&self) -> &Till {
        &self.till
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let cart_id = self.cart_id;
        let closed = self
            .till
            .try_with_store_mut(|store| store.close_cart(cart_id))
            .flatten();
        debug!(
            session_id = %self.id,
            lines = closed.map_or(0, |cart| cart.len()),
            "Session closed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TillConfig;

    #[test]
    fn test_drop_releases_cart_references() {
        let till = Till::new(TillConfig::default()).unwrap();
        let session = till.open_session();
        till.with_store_mut(|s| s.add_to_cart(session.cart_id(), "p1", 2))
            .unwrap();
        assert_eq!(till.with_store(|s| s.cart_references("p1")), 1);

        drop(session);

        assert_eq!(till.with_store(|s| s.cart_references("p1")), 0);
        assert_eq!(till.with_store(|s| s.open_cart_count()), 0);
    }

    #[test]
    fn test_sessions_have_distinct_ids_and_carts() {
        let till = Till::new(TillConfig::default()).unwrap();
        let a = till.open_session();
        let b = till.open_session();

        assert_ne!(a.id(), b.id());
        assert_ne!(a.cart_id(), b.cart_id());
    }
}
