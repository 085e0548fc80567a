use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt::Debug;

use crate::error::SerializeError;
use crate::info::{TypeInfo, Typed};
use crate::object::WireObject;
use crate::serializer::{CustomSerializer, Strategy, type_mismatch};

type Rebuild = fn(Box<dyn WireObject>) -> Result<Box<dyn WireObject>, SerializeError>;

fn rebuild_from<S, P>(decoded: Box<dyn WireObject>) -> Result<Box<dyn WireObject>, SerializeError>
where
    S: Typed + From<P> + Debug + Send + Sync,
    P: Typed,
{
    let found = decoded.type_info();
    match decoded.take::<P>() {
        Some(parent) => Ok(Box::new(S::from(parent))),
        None => Err(type_mismatch(P::type_info(), found)),
    }
}

// Proxy and scalar payloads are written from an upcast view of the target.
fn writes_from_upcast(serializer: &CustomSerializer) -> bool {
    match serializer.strategy() {
        Strategy::Proxy(_) | Strategy::ScalarString(_) => true,
        Strategy::SubclassForwarding(s) => writes_from_upcast(s.parent()),
        Strategy::Exact(_) | Strategy::Interface(_) => false,
    }
}

// -----------------------------------------------------------------------------
// ForwardingStrategy

/// Writes one subclass with its parent serializer's payload logic.
///
/// The subclass gets a descriptor of its own, fingerprinted from the
/// parent's descriptor and the subclass path, and announces the relation
/// through a restricted schema notation. The parent's type predicate is
/// bypassed: only the payload logic is shared.
pub struct ForwardingStrategy {
    subclass: &'static TypeInfo,
    parent: Arc<CustomSerializer>,
    rebuild: Option<Rebuild>,
}

impl ForwardingStrategy {
    /// Fails with [`SerializeError::NotASubclass`] if `S` is not assignable
    /// to the target of `parent`, and with [`SerializeError::NoUpcast`] if
    /// `parent` is a proxy or scalar string serializer and `S` reaches its
    /// target only through marker edges.
    pub fn new<S: Typed>(parent: Arc<CustomSerializer>) -> Result<Self, SerializeError> {
        let subclass = S::type_info();
        let target = parent.target();
        if !subclass.is_assignable_to(target) {
            return Err(SerializeError::NotASubclass {
                subclass: subclass.path().into(),
                parent: target.path().into(),
            });
        }
        if writes_from_upcast(&parent) && !subclass.can_upcast_to(target) {
            return Err(SerializeError::NoUpcast {
                subclass: subclass.path().into(),
                parent: target.path().into(),
            });
        }
        Ok(Self {
            subclass,
            parent,
            rebuild: None,
        })
    }

    /// Like [`new`](Self::new), turning the decoded `P` back into an `S`.
    pub fn rebuilding<S, P>(parent: Arc<CustomSerializer>) -> Result<Self, SerializeError>
    where
        S: Typed + From<P> + Debug + Send + Sync,
        P: Typed,
    {
        let mut strategy = Self::new::<S>(parent)?;
        strategy.rebuild = Some(rebuild_from::<S, P>);
        Ok(strategy)
    }

    #[inline]
    pub fn subclass(&self) -> &'static TypeInfo {
        self.subclass
    }

    #[inline]
    pub fn parent(&self) -> &Arc<CustomSerializer> {
        &self.parent
    }

    pub(super) fn rebuild(
        &self,
        decoded: Box<dyn WireObject>,
    ) -> Result<Box<dyn WireObject>, SerializeError> {
        match self.rebuild {
            Some(rebuild) => rebuild(decoded),
            None => Ok(decoded),
        }
    }
}
