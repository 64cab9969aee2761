use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Free-text location, always populated. `city`/`state` are kept when
    /// the course was entered with split fields.
    pub location: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub holes: i32,
    pub par: i32,
    pub amenities: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    /// Only active courses are offered when creating events.
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tee_set::Entity")]
    TeeSet,
    #[sea_orm(has_many = "super::hole::Entity")]
    Hole,
    #[sea_orm(has_many = "super::event::Entity")]
    Event,
}

impl Related<super::tee_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeeSet.def()
    }
}

impl Related<super::hole::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hole.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
