use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(User::Username).string_len(150).not_null())
                    .col(ColumnDef::new(User::Email).string().not_null().default(""))
                    .col(ColumnDef::new(User::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(User::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_user_username")
                    .table(User::Table)
                    .col(User::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Sessions
        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Session::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Session::Token).string_len(64).not_null())
                    .col(ColumnDef::new(Session::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(Session::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Session::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_user_id")
                            .from(Session::Table, Session::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_session_token")
                    .table(Session::Table)
                    .col(Session::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Branches
        manager
            .create_table(
                Table::create()
                    .table(Branch::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Branch::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Branch::Name).string_len(100).not_null())
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_branch_name")
                    .table(Branch::Table)
                    .col(Branch::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Semesters
        manager
            .create_table(
                Table::create()
                    .table(Semester::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semester::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Semester::Number)
                            .integer()
                            .not_null()
                            .check(Expr::col(Semester::Number).gt(0)),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_semester_number")
                    .table(Semester::Table)
                    .col(Semester::Number)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Subjects
        manager
            .create_table(
                Table::create()
                    .table(Subject::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subject::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subject::BranchId).integer().not_null())
                    .col(ColumnDef::new(Subject::SemesterId).integer().not_null())
                    .col(ColumnDef::new(Subject::Name).string_len(150).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_branch_id")
                            .from(Subject::Table, Subject::BranchId)
                            .to(Branch::Table, Branch::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subject_semester_id")
                            .from(Subject::Table, Subject::SemesterId)
                            .to(Semester::Table, Semester::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_subject_branch_semester_name")
                    .table(Subject::Table)
                    .col(Subject::BranchId)
                    .col(Subject::SemesterId)
                    .col(Subject::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Uploads
        manager
            .create_table(
                Table::create()
                    .table(Upload::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Upload::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Upload::UploaderId).integer().not_null())
                    .col(ColumnDef::new(Upload::SubjectId).integer().not_null())
                    .col(ColumnDef::new(Upload::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Upload::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Upload::FileRef).string().not_null())
                    .col(ColumnDef::new(Upload::OriginalFilename).string().not_null())
                    .col(ColumnDef::new(Upload::MimeType).string())
                    .col(ColumnDef::new(Upload::ByteSize).big_integer().not_null())
                    .col(ColumnDef::new(Upload::FileSha256).string_len(64).not_null())
                    .col(ColumnDef::new(Upload::UploadType).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Upload::Status)
                            .string_len(20)
                            .not_null()
                            .default("UNVERIFIED"),
                    )
                    .col(
                        ColumnDef::new(Upload::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upload_uploader_id")
                            .from(Upload::Table, Upload::UploaderId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upload_subject_id")
                            .from(Upload::Table, Upload::SubjectId)
                            .to(Subject::Table, Subject::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_upload_status_created_at")
                    .table(Upload::Table)
                    .col(Upload::Status)
                    .col(Upload::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_upload_uploader_id")
                    .table(Upload::Table)
                    .col(Upload::UploaderId)
                    .to_owned(),
            )
            .await?;

        // Ratings
        manager
            .create_table(
                Table::create()
                    .table(Rating::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rating::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rating::UserId).integer().not_null())
                    .col(ColumnDef::new(Rating::UploadId).integer().not_null())
                    .col(
                        ColumnDef::new(Rating::Stars)
                            .integer()
                            .not_null()
                            .check(Expr::col(Rating::Stars).between(1, 5)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_user_id")
                            .from(Rating::Table, Rating::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rating_upload_id")
                            .from(Rating::Table, Rating::UploadId)
                            .to(Upload::Table, Upload::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_rating_user_upload")
                    .table(Rating::Table)
                    .col(Rating::UserId)
                    .col(Rating::UploadId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Reports
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Report::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Report::ReporterId).integer().not_null())
                    .col(ColumnDef::new(Report::UploadId).integer().not_null())
                    .col(ColumnDef::new(Report::Reason).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_reporter_id")
                            .from(Report::Table, Report::ReporterId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_upload_id")
                            .from(Report::Table, Report::UploadId)
                            .to(Upload::Table, Upload::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_report_reporter_upload")
                    .table(Report::Table)
                    .col(Report::ReporterId)
                    .col(Report::UploadId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Points ledger, append-only
        manager
            .create_table(
                Table::create()
                    .table(PointsLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PointsLog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PointsLog::UserId).integer().not_null())
                    .col(ColumnDef::new(PointsLog::Action).string_len(100).not_null())
                    .col(ColumnDef::new(PointsLog::PointsChange).integer().not_null())
                    .col(
                        ColumnDef::new(PointsLog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_log_user_id")
                            .from(PointsLog::Table, PointsLog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_points_log_user_id")
                    .table(PointsLog::Table)
                    .col(PointsLog::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // reverse order of creation
        manager
            .drop_table(Table::drop().table(PointsLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rating::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Upload::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subject::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Semester::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Branch::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Session::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    IsStaff,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Session {
    #[sea_orm(iden = "sessions")]
    Table,
    Id,
    Token,
    UserId,
    CreatedAt,
    ExpiresAt,
}

#[derive(DeriveIden)]
enum Branch {
    #[sea_orm(iden = "branches")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Semester {
    #[sea_orm(iden = "semesters")]
    Table,
    Id,
    Number,
}

#[derive(DeriveIden)]
enum Subject {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    BranchId,
    SemesterId,
    Name,
}

#[derive(DeriveIden)]
enum Upload {
    #[sea_orm(iden = "uploads")]
    Table,
    Id,
    UploaderId,
    SubjectId,
    Title,
    Description,
    FileRef,
    OriginalFilename,
    MimeType,
    ByteSize,
    FileSha256,
    UploadType,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Rating {
    #[sea_orm(iden = "ratings")]
    Table,
    Id,
    UserId,
    UploadId,
    Stars,
}

#[derive(DeriveIden)]
enum Report {
    #[sea_orm(iden = "reports")]
    Table,
    Id,
    ReporterId,
    UploadId,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PointsLog {
    #[sea_orm(iden = "points_logs")]
    Table,
    Id,
    UserId,
    Action,
    PointsChange,
    CreatedAt,
}
