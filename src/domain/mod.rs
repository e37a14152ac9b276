/// Domain layer: configuration model, identities and status snapshots
pub mod entities;
pub mod value_objects;
