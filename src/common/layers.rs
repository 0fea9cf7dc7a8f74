//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerAttack,
    EnemyAttack,
}

/// Player body: stands on the world, can be struck by enemy hitboxes.
pub fn player_body_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Player, [Layer::World, Layer::EnemyAttack])
}

/// Enemy body: stands on the world, can be struck by player hitboxes.
pub fn enemy_body_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::World, Layer::PlayerAttack])
}

/// A body that no longer interacts with hitboxes but still rests on the ground.
pub fn downed_body_layers(membership: Layer) -> CollisionLayers {
    CollisionLayers::new(membership, [Layer::World])
}

pub fn world_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::World, [Layer::Player, Layer::Enemy])
}
