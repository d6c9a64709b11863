use chrono::{DateTime, Utc};
use poem_openapi::{ApiResponse, Enum, Object, payload::Json};
use uuid::Uuid;

use crate::domain::models::{Book, Category};
use crate::library_api::services::progress::ProgressView;

/// Shelf category, mirrored from the domain's fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[oai(rename_all = "lowercase")]
pub enum CategoryDto {
    Fiction,
    Nonfiction,
    Textbook,
    Reference,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        match c {
            Category::Fiction => CategoryDto::Fiction,
            Category::Nonfiction => CategoryDto::Nonfiction,
            Category::Textbook => CategoryDto::Textbook,
            Category::Reference => CategoryDto::Reference,
        }
    }
}

impl From<CategoryDto> for Category {
    fn from(c: CategoryDto) -> Self {
        match c {
            CategoryDto::Fiction => Category::Fiction,
            CategoryDto::Nonfiction => Category::Nonfiction,
            CategoryDto::Textbook => Category::Textbook,
            CategoryDto::Reference => Category::Reference,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct BookDto {
    pub id: Uuid,
    pub name: String,
    pub category: Option<CategoryDto>,
    pub file_url: String,
    /// Last page read, filled on dashboard listings.
    pub last_page: Option<i32>,
    pub total_pages: Option<i32>,
}

impl BookDto {
    pub fn from_book(book: Book) -> Self {
        Self {
            id: book.id,
            name: book.name,
            category: book.category.map(Into::into),
            file_url: book.file_url,
            last_page: None,
            total_pages: None,
        }
    }

    pub fn with_progress(book: Book, view: &ProgressView) -> Self {
        let mut dto = Self::from_book(book);
        dto.last_page = Some(view.page);
        dto.total_pages = Some(view.total_pages);
        dto
    }
}

#[derive(Debug, Clone, Object)]
pub struct ProgressDto {
    pub page: i32,
    pub total_pages: i32,
    pub last_read_at: Option<DateTime<Utc>>,
}

impl From<ProgressView> for ProgressDto {
    fn from(view: ProgressView) -> Self {
        Self {
            page: view.page,
            total_pages: view.total_pages,
            last_read_at: view.last_read_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct UploadBookRequestDto {
    /// Display name, usually the original file name.
    pub name: String,
    pub category: Option<CategoryDto>,
    /// PDF payload as a base64 data URL ("data:application/pdf;base64,…").
    pub data: String,
}

#[derive(Debug, Clone, Object)]
pub struct SaveProgressRequestDto {
    pub page: i32,
    pub total_pages: i32,
}

#[derive(Debug, Clone, Object)]
pub struct UserDto {
    pub id: Uuid,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Object)]
pub struct LoginUrlDto {
    /// Identity provider redirect to start the OAuth flow.
    pub url: String,
}

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

#[derive(ApiResponse)]
pub enum BookListResponseDto {
    /// Reconciled book list with reading progress
    #[oai(status = 200)]
    Ok(Json<Vec<BookDto>>),

    /// Caller is not signed in
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum BookGetResponseDto {
    #[oai(status = 200)]
    Ok(Json<BookDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// No such book for this owner
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    /// Upstream store error
    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum UploadResponseDto {
    /// Book stored remotely and mirrored locally
    #[oai(status = 201)]
    Created(Json<BookDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum DeleteResponseDto {
    /// Cascade finished (best-effort)
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ProgressGetResponseDto {
    /// Saved position, or page 0 of 0 when none exists yet
    #[oai(status = 200)]
    Ok(Json<ProgressDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum ProgressPutResponseDto {
    /// Upserted position
    #[oai(status = 200)]
    Ok(Json<ProgressDto>),

    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 502)]
    BadGateway(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum UserResponseDto {
    #[oai(status = 200)]
    Ok(Json<UserDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum LoginUrlResponseDto {
    #[oai(status = 200)]
    Ok(Json<LoginUrlDto>),

    /// No redirect target configured or supplied
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum CacheClearResponseDto {
    /// Local replica dropped; next listing rebuilds it
    #[oai(status = 204)]
    NoContent,

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}
