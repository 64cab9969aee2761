use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tee_set_distances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub hole_id: i32,
    pub tee_set_id: i32,
    /// Yards.
    pub length: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hole::Entity",
        from = "Column::HoleId",
        to = "super::hole::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Hole,
    #[sea_orm(
        belongs_to = "super::tee_set::Entity",
        from = "Column::TeeSetId",
        to = "super::tee_set::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TeeSet,
}

impl Related<super::hole::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hole.def()
    }
}

impl Related<super::tee_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeeSet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
