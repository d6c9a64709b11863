use std::sync::Arc;

use poem_openapi::{
    OpenApi,
    param::{Path, Query},
    payload::{Json, PlainText},
};
use uuid::Uuid;

use super::models::{
    BookDto, BookGetResponseDto, BookListResponseDto, CacheClearResponseDto, DeleteResponseDto,
    ErrorDto, LoginUrlDto, LoginUrlResponseDto, ProgressGetResponseDto, ProgressPutResponseDto,
    SaveProgressRequestDto, UploadBookRequestDto, UploadResponseDto, UserDto, UserResponseDto,
};
use super::services::{
    books::{BookService, UploadError},
    health::HealthService,
    progress::ProgressService,
    sync::SyncService,
};
use crate::cache::LocalCache;
use crate::config::Config;
use crate::remote_client::{RemoteClient, RemoteError, UserInfo};
use crate::storage::BookCache;

pub struct ShelfApi {
    pub remote: Arc<RemoteClient>,
    pub cache: Arc<LocalCache>,
    pub config: Arc<Config>,
}

impl ShelfApi {
    /// Resolve the path token to the signed-in owner; every data endpoint
    /// goes through this first.
    async fn signed_in_user(&self, token: &str) -> Result<UserInfo, ErrorDto> {
        match self.remote.current_user(token).await {
            Ok(user) => Ok(user),
            Err(RemoteError::NotAuthenticated) => Err(ErrorDto {
                message: "not signed in".to_string(),
            }),
            Err(e) => {
                tracing::warn!(error = %e, "identity lookup failed");
                Err(ErrorDto {
                    message: format!("identity lookup failed: {}", e),
                })
            }
        }
    }

    fn book_service(&self) -> BookService<'_> {
        BookService::new(&*self.remote, &*self.remote, &*self.remote, &*self.cache)
    }
}

#[OpenApi]
impl ShelfApi {
    /// Service health, including remote store reachability
    #[oai(path = "/status", method = "get")]
    #[tracing::instrument(level = "debug", skip(self))]
    async fn status(&self) -> PlainText<String> {
        tracing::debug!("handling /status");
        HealthService::new(&self.remote).status_text().await
    }

    /// Identity-provider redirect URL to start the login flow
    #[oai(path = "/v1/login-url", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, redirect_to))]
    async fn login_url(
        &self,
        /// Where the provider should send the browser back to; defaults to
        /// the configured dashboard URL
        Query(redirect_to): Query<Option<String>>,
    ) -> LoginUrlResponseDto {
        let target = redirect_to.unwrap_or_else(|| self.config.login_redirect_url.clone());
        if target.is_empty() {
            return LoginUrlResponseDto::BadRequest(Json(ErrorDto {
                message: "no redirect target configured; pass ?redirect_to=".to_string(),
            }));
        }
        LoginUrlResponseDto::Ok(Json(LoginUrlDto {
            url: self.remote.authorize_url("github", &target),
        }))
    }

    /// The signed-in user
    #[oai(path = "/shelf/:auth_token/v1/me", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth_token))]
    async fn me(&self, auth_token: Path<String>) -> UserResponseDto {
        match self.signed_in_user(&auth_token.0).await {
            Ok(user) => UserResponseDto::Ok(Json(UserDto {
                id: user.id,
                display_name: user.display_name,
            })),
            Err(e) => UserResponseDto::Unauthorized(Json(e)),
        }
    }

    /// Dashboard listing: reconciles the local replica with the remote set
    /// and attaches each book's reading position
    #[oai(path = "/shelf/:auth_token/v1/books", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth_token))]
    async fn list_books(&self, auth_token: Path<String>) -> BookListResponseDto {
        let user = match self.signed_in_user(&auth_token.0).await {
            Ok(user) => user,
            Err(e) => return BookListResponseDto::Unauthorized(Json(e)),
        };

        let books = SyncService::new(&*self.remote, &*self.cache)
            .reconcile(user.id)
            .await;

        let progress = ProgressService::new(&*self.remote, &*self.cache);
        let mut dtos = Vec::with_capacity(books.len());
        for book in books {
            let view = progress.get_progress(user.id, book.id).await;
            dtos.push(BookDto::with_progress(book, &view));
        }
        BookListResponseDto::Ok(Json(dtos))
    }

    /// Upload a PDF: blob first, then metadata row, then local mirror
    #[oai(path = "/shelf/:auth_token/v1/books", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, auth_token, body))]
    async fn upload_book(
        &self,
        auth_token: Path<String>,
        body: Json<UploadBookRequestDto>,
    ) -> UploadResponseDto {
        let user = match self.signed_in_user(&auth_token.0).await {
            Ok(user) => user,
            Err(e) => return UploadResponseDto::Unauthorized(Json(e)),
        };
        let req = body.0;
        if req.name.trim().is_empty() {
            return UploadResponseDto::BadRequest(Json(ErrorDto {
                message: "name is required".to_string(),
            }));
        }

        let result = self
            .book_service()
            .upload(user.id, &req.name, req.category.map(Into::into), &req.data)
            .await;
        match result {
            Ok(book) => UploadResponseDto::Created(Json(BookDto::from_book(book))),
            Err(UploadError::InvalidPayload(msg)) => {
                UploadResponseDto::BadRequest(Json(ErrorDto { message: msg }))
            }
            Err(UploadError::Remote(e)) => UploadResponseDto::BadGateway(Json(ErrorDto {
                message: format!("remote store error: {}", e),
            })),
        }
    }

    /// Delete a book by display name: blob, progress record, metadata rows
    /// and local replica, best-effort
    #[oai(path = "/shelf/:auth_token/v1/books/by-name/:name", method = "delete")]
    #[tracing::instrument(level = "debug", skip(self, auth_token, name))]
    async fn delete_book(&self, auth_token: Path<String>, name: Path<String>) -> DeleteResponseDto {
        let user = match self.signed_in_user(&auth_token.0).await {
            Ok(user) => user,
            Err(e) => return DeleteResponseDto::Unauthorized(Json(e)),
        };

        match self.book_service().delete(user.id, &name.0).await {
            Ok(()) => DeleteResponseDto::NoContent,
            Err(RemoteError::NotFound) => DeleteResponseDto::NotFound(Json(ErrorDto {
                message: format!("no book named {}", name.0),
            })),
            Err(e) => DeleteResponseDto::BadGateway(Json(ErrorDto {
                message: format!("remote store error: {}", e),
            })),
        }
    }

    /// Fetch one book for the reader (replica first, remote fallback)
    #[oai(path = "/shelf/:auth_token/v1/books/:book_id", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth_token, book_id))]
    async fn get_book(&self, auth_token: Path<String>, book_id: Path<Uuid>) -> BookGetResponseDto {
        let user = match self.signed_in_user(&auth_token.0).await {
            Ok(user) => user,
            Err(e) => return BookGetResponseDto::Unauthorized(Json(e)),
        };

        match self.book_service().get(user.id, book_id.0).await {
            Ok(Some(book)) => BookGetResponseDto::Ok(Json(BookDto::from_book(book))),
            Ok(None) => BookGetResponseDto::NotFound(Json(ErrorDto {
                message: "book not found".to_string(),
            })),
            Err(e) => BookGetResponseDto::BadGateway(Json(ErrorDto {
                message: format!("remote store error: {}", e),
            })),
        }
    }

    /// Reading position for a book; page 0 of 0 when never read
    #[oai(path = "/shelf/:auth_token/v1/books/:book_id/progress", method = "get")]
    #[tracing::instrument(level = "debug", skip(self, auth_token, book_id))]
    async fn get_progress(
        &self,
        auth_token: Path<String>,
        book_id: Path<Uuid>,
    ) -> ProgressGetResponseDto {
        let user = match self.signed_in_user(&auth_token.0).await {
            Ok(user) => user,
            Err(e) => return ProgressGetResponseDto::Unauthorized(Json(e)),
        };

        let view = ProgressService::new(&*self.remote, &*self.cache)
            .get_progress(user.id, book_id.0)
            .await;
        ProgressGetResponseDto::Ok(Json(view.into()))
    }

    /// Save the reading position (atomic upsert on owner + book)
    #[oai(path = "/shelf/:auth_token/v1/books/:book_id/progress", method = "put")]
    #[tracing::instrument(level = "debug", skip(self, auth_token, book_id, body))]
    async fn put_progress(
        &self,
        auth_token: Path<String>,
        book_id: Path<Uuid>,
        body: Json<SaveProgressRequestDto>,
    ) -> ProgressPutResponseDto {
        let user = match self.signed_in_user(&auth_token.0).await {
            Ok(user) => user,
            Err(e) => return ProgressPutResponseDto::Unauthorized(Json(e)),
        };
        let req = body.0;
        if req.page < 0 || req.total_pages < 0 {
            return ProgressPutResponseDto::BadRequest(Json(ErrorDto {
                message: "page and total_pages must be non-negative".to_string(),
            }));
        }

        let result = ProgressService::new(&*self.remote, &*self.cache)
            .save_progress(user.id, book_id.0, req.page, req.total_pages)
            .await;
        match result {
            Ok(record) => ProgressPutResponseDto::Ok(Json(super::models::ProgressDto {
                page: record.page,
                total_pages: record.total_pages,
                last_read_at: Some(record.last_read_at),
            })),
            Err(e) => ProgressPutResponseDto::BadGateway(Json(ErrorDto {
                message: format!("remote store error: {}", e),
            })),
        }
    }

    /// Drop the local replica; the next listing rebuilds it from remote
    #[oai(path = "/shelf/:auth_token/v1/cache/clear", method = "post")]
    #[tracing::instrument(level = "debug", skip(self, auth_token))]
    async fn clear_cache(&self, auth_token: Path<String>) -> CacheClearResponseDto {
        if let Err(e) = self.signed_in_user(&auth_token.0).await {
            return CacheClearResponseDto::Unauthorized(Json(e));
        }

        match self.cache.clear().await {
            Ok(()) => CacheClearResponseDto::NoContent,
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), "failed to clear local cache");
                CacheClearResponseDto::InternalError(Json(ErrorDto {
                    message: "failed to clear local cache".to_string(),
                }))
            }
        }
    }
}
