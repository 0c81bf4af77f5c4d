use diesel::pg::Pg;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::inquiry::{CreateInquiry, Inquiry, InquiryUpdate};
use crate::domain::next_modified_at;
use crate::domain::ports::InquiryRepository;
use crate::domain::quote::{ListFilter, ListResult};
use crate::domain::status::InquiryStatus;
use crate::schema::inquiries;

use super::like_pattern;
use super::models::{InquiryChanges, InquiryRow, NewInquiryRow};

pub struct DieselInquiryRepository {
    pool: DbPool,
}

impl DieselInquiryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn filtered(filter: &ListFilter<InquiryStatus>) -> inquiries::BoxedQuery<'static, Pg> {
    let mut query = inquiries::table.into_boxed();
    if let Some(status) = filter.status {
        query = query.filter(inquiries::status.eq(status.as_str()));
    }
    if let Some(term) = filter.search_term() {
        let pattern = like_pattern(term);
        query = query.filter(
            inquiries::name
                .ilike(pattern.clone())
                .or(inquiries::email.ilike(pattern.clone()))
                .or(inquiries::phone.assume_not_null().ilike(pattern.clone()))
                .or(inquiries::company.assume_not_null().ilike(pattern)),
        );
    }
    query
}

impl InquiryRepository for DieselInquiryRepository {
    fn create(&self, inquiry: &CreateInquiry) -> Result<Inquiry, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(inquiries::table)
            .values(&NewInquiryRow {
                id: Uuid::new_v4(),
                name: inquiry.name.trim().to_string(),
                email: inquiry.email.trim().to_string(),
                phone: inquiry.phone.clone(),
                company: inquiry.company.clone(),
                subject: inquiry.subject.clone(),
                message: inquiry.message.clone(),
                status: InquiryStatus::New.as_str().to_string(),
            })
            .returning(InquiryRow::as_returning())
            .get_result::<InquiryRow>(&mut conn)?;

        row.try_into()
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Inquiry>, DomainError> {
        let mut conn = self.pool.get()?;

        inquiries::table
            .find(id)
            .select(InquiryRow::as_select())
            .first::<InquiryRow>(&mut conn)
            .optional()?
            .map(Inquiry::try_from)
            .transpose()
    }

    fn list(
        &self,
        filter: &ListFilter<InquiryStatus>,
    ) -> Result<ListResult<Inquiry>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = filtered(filter).count().get_result(conn)?;

            let rows = filtered(filter)
                .select(InquiryRow::as_select())
                .order((inquiries::created_at.desc(), inquiries::id.desc()))
                .limit(filter.limit)
                .offset(filter.offset())
                .load::<InquiryRow>(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(Inquiry::try_from)
                    .collect::<Result<_, _>>()?,
                total,
            })
        })
    }

    fn update(&self, id: Uuid, update: &InquiryUpdate) -> Result<Option<Inquiry>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let current = inquiries::table
                .find(id)
                .select(InquiryRow::as_select())
                .for_update()
                .first::<InquiryRow>(conn)
                .optional()?;
            let Some(current) = current else {
                return Ok(None);
            };

            let row = diesel::update(inquiries::table.find(id))
                .set(&InquiryChanges {
                    status: update.status.map(|s| s.as_str().to_string()),
                    admin_notes: update.admin_notes.clone(),
                    updated_at: next_modified_at(current.updated_at),
                })
                .returning(InquiryRow::as_returning())
                .get_result::<InquiryRow>(conn)?;

            Inquiry::try_from(row).map(Some)
        })
    }
}
