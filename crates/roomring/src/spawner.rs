//! Room instantiation capability
//!
//! The ring never touches a scene graph directly. Hosts implement
//! [`RoomSpawner`] to turn a template and a pose into a live room, and to
//! tear it down again.

use crate::slot::Pose;

/// Host-side room instantiation
pub trait RoomSpawner {
    /// Opaque room template
    type Template;
    /// Handle to a live room instance
    type Handle;
    /// Node the rooms are parented under
    type Parent;
    /// Host error
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a live room from `template` at `pose`, relative to `parent`
    fn spawn(
        &mut self,
        template: &Self::Template,
        pose: &Pose,
        parent: &Self::Parent,
    ) -> Result<Self::Handle, Self::Error>;

    /// Destroy a live room
    ///
    /// On error the room is assumed to still be alive; the ring keeps the
    /// handle and retries later.
    fn despawn(&mut self, handle: &Self::Handle) -> Result<(), Self::Error>;
}

impl<S: RoomSpawner + ?Sized> RoomSpawner for &mut S {
    type Template = S::Template;
    type Handle = S::Handle;
    type Parent = S::Parent;
    type Error = S::Error;

    fn spawn(
        &mut self,
        template: &Self::Template,
        pose: &Pose,
        parent: &Self::Parent,
    ) -> Result<Self::Handle, Self::Error> {
        (**self).spawn(template, pose, parent)
    }

    fn despawn(&mut self, handle: &Self::Handle) -> Result<(), Self::Error> {
        (**self).despawn(handle)
    }
}
