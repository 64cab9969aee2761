use super::sea_orm_active_enums::ClubType;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "clubs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    pub name: String,
    pub club_type: ClubType,
    pub brand: Option<String>,
    pub model_name: Option<String>,
    pub loft: Option<f64>,
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

impl Related<super::bag::Entity> for Entity {
    fn to() -> RelationDef {
        super::bag_club::Relation::Bag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::bag_club::Relation::Club.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
