//! `SeaORM` Entity for cluster table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cluster")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cluster_name: String,
    pub server_url: String,
    pub active: Option<bool>,
    #[sea_orm(column_type = "Text")]
    pub config: String,
    pub k8s_version: String,
    pub error_in_connecting: String,
    pub created_on: DateTime,
    pub created_by: i32,
    pub updated_on: DateTime,
    pub updated_by: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
