use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub external_id: i64,
    pub title: String,
    /// Lowercased, trimmed title. Carries the unique index.
    #[sea_orm(unique)]
    pub title_key: String,
    pub year: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub similar_title: Option<String>,
    pub watched: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movie_images::Entity")]
    MovieImages,
}

impl Related<super::movie_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovieImages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
