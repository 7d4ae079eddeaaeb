use bitflags::bitflags;

bitflags! {
    /// Presentation and scheduling flags carried by every entity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct EntityFlags: u8 {
        /// Entity is idle and may be claimed by the planner or orchestration.
        const IDLE    = 1 << 0;
        /// Entity has finished production and exists on the map.
        const VISIBLE = 1 << 1;
    }
}
