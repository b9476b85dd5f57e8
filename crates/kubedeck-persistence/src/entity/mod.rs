pub mod cluster;

pub mod prelude {
    pub use super::cluster::Entity as ClusterEntity;
}
