use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Movies::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Movies::ExternalId).big_integer().not_null())
                    .col(ColumnDef::new(Movies::Title).string().not_null())
                    .col(ColumnDef::new(Movies::TitleKey).string().not_null())
                    .col(ColumnDef::new(Movies::Year).string())
                    .col(ColumnDef::new(Movies::Director).string())
                    .col(ColumnDef::new(Movies::Genre).string())
                    .col(ColumnDef::new(Movies::SimilarTitle).string())
                    .col(
                        ColumnDef::new(Movies::Watched)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Movies::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // The authoritative duplicate guard; the service-level lookup is only a fast path.
        manager
            .create_index(
                Index::create()
                    .name("idx_movies_title_key_unique")
                    .table(Movies::Table)
                    .col(Movies::TitleKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MovieImages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieImages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MovieImages::MovieId).integer().not_null())
                    .col(
                        ColumnDef::new(MovieImages::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(MovieImages::ImageType).string().not_null())
                    .col(ColumnDef::new(MovieImages::ContentType).string().not_null())
                    .col(ColumnDef::new(MovieImages::ImageData).blob().not_null())
                    // No ON DELETE CASCADE: images are removed explicitly in the same
                    // transaction as their movie, and the key rejects any orphan.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_movie_images_movie_id")
                            .from(MovieImages::Table, MovieImages::MovieId)
                            .to(Movies::Table, Movies::Id)
                            .on_delete(ForeignKeyAction::NoAction)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_images_movie_id")
                    .table(MovieImages::Table)
                    .col(MovieImages::MovieId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Movies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    ExternalId,
    Title,
    TitleKey,
    Year,
    Director,
    Genre,
    SimilarTitle,
    Watched,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MovieImages {
    Table,
    Id,
    MovieId,
    Position,
    ImageType,
    ContentType,
    ImageData,
}
