use crate::persistence::{
    BranchActiveModel, BranchColumn, BranchEntity, BranchModel, SemesterActiveModel,
    SemesterColumn, SemesterEntity, SemesterModel, SubjectActiveModel, SubjectColumn,
    SubjectEntity, SubjectModel,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::OnConflict,
};

pub(crate) struct TaxonomyRepository;

impl TaxonomyRepository {
    pub(crate) async fn list_branches<C>(db: &C) -> Result<Vec<BranchModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        BranchEntity::find()
            .order_by_asc(BranchColumn::Name)
            .all(db)
            .await
    }

    pub(crate) async fn list_semesters<C>(db: &C) -> Result<Vec<SemesterModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SemesterEntity::find()
            .order_by_asc(SemesterColumn::Number)
            .all(db)
            .await
    }

    pub(crate) async fn list_subjects<C>(
        db: &C,
        branch_id: Option<i32>,
        semester_id: Option<i32>,
    ) -> Result<Vec<SubjectModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut select = SubjectEntity::find();
        if let Some(branch_id) = branch_id {
            select = select.filter(SubjectColumn::BranchId.eq(branch_id));
        }
        if let Some(semester_id) = semester_id {
            select = select.filter(SubjectColumn::SemesterId.eq(semester_id));
        }

        select
            .order_by_asc(SubjectColumn::Name)
            .order_by_asc(SubjectColumn::Id)
            .all(db)
            .await
    }

    pub(crate) async fn subject_ids_matching<C>(
        db: &C,
        branch_id: Option<i32>,
        semester_id: Option<i32>,
    ) -> Result<Vec<i32>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut select = SubjectEntity::find()
            .select_only()
            .column(SubjectColumn::Id);
        if let Some(branch_id) = branch_id {
            select = select.filter(SubjectColumn::BranchId.eq(branch_id));
        }
        if let Some(semester_id) = semester_id {
            select = select.filter(SubjectColumn::SemesterId.eq(semester_id));
        }

        select.into_tuple().all(db).await
    }

    pub(crate) async fn find_subject<C>(db: &C, id: i32) -> Result<Option<SubjectModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SubjectEntity::find_by_id(id).one(db).await
    }

    pub(crate) async fn subjects_by_ids<C>(db: &C, ids: &[i32]) -> Result<Vec<SubjectModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        SubjectEntity::find()
            .filter(SubjectColumn::Id.is_in(ids.iter().copied()))
            .all(db)
            .await
    }

    /// Returns the branch and whether this call created it.
    pub(crate) async fn get_or_create_branch<C>(
        db: &C,
        name: &str,
    ) -> Result<(BranchModel, bool), DbErr>
    where
        C: ConnectionTrait,
    {
        let inserted = BranchEntity::insert(BranchActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(BranchColumn::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

        let branch = BranchEntity::find()
            .filter(BranchColumn::Name.eq(name))
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("branch `{name}` vanished after insert")))?;

        Ok((branch, inserted > 0))
    }

    pub(crate) async fn get_or_create_semester<C>(
        db: &C,
        number: i32,
    ) -> Result<(SemesterModel, bool), DbErr>
    where
        C: ConnectionTrait,
    {
        let inserted = SemesterEntity::insert(SemesterActiveModel {
            number: Set(number),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(SemesterColumn::Number)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

        let semester = SemesterEntity::find()
            .filter(SemesterColumn::Number.eq(number))
            .one(db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!("semester {number} vanished after insert"))
            })?;

        Ok((semester, inserted > 0))
    }

    /// Returns `true` when a new row was written.
    pub(crate) async fn insert_subject_if_absent<C>(
        db: &C,
        branch_id: i32,
        semester_id: i32,
        name: &str,
    ) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let inserted = SubjectEntity::insert(SubjectActiveModel {
            branch_id: Set(branch_id),
            semester_id: Set(semester_id),
            name: Set(name.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([
                SubjectColumn::BranchId,
                SubjectColumn::SemesterId,
                SubjectColumn::Name,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

        Ok(inserted > 0)
    }
}
