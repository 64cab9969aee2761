use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
    pub brand: Option<String>,
    pub model_name: Option<String>,
    pub is_primary: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bag_club::Entity")]
    BagClub,
}

impl Related<super::bag_club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BagClub.def()
    }
}

impl Related<super::club::Entity> for Entity {
    fn to() -> RelationDef {
        super::bag_club::Relation::Club.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::bag_club::Relation::Bag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
