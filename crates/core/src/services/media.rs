//! Media service.
//!
//! Uploaded files live in the storage backend; the `media` table maps ids to
//! file names and, once a post claims them, to that post.

use std::collections::HashMap;

use warbler_common::{AppError, AppResult, IdGenerator, StorageService};
use warbler_db::repositories::MediaRepository;

/// Media service for uploads and their cleanup.
#[derive(Clone)]
pub struct MediaService {
    media_repo: MediaRepository,
    storage: StorageService,
    id_gen: IdGenerator,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub fn new(media_repo: MediaRepository, storage: StorageService) -> Self {
        Self {
            media_repo,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Store `data` under a fresh name and record it. Returns the media id.
    pub async fn upload(&self, data: &[u8]) -> AppResult<i32> {
        let file_name = self.id_gen.media_file_name();
        self.storage.save(&file_name, data).await?;

        match self.media_repo.create(&file_name).await {
            Ok(media) => {
                tracing::debug!(
                    media_id = media.id,
                    file = %file_name,
                    size = data.len(),
                    "Stored media"
                );
                Ok(media.id)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    file = %file_name,
                    "Media row insert failed, file is orphaned"
                );
                Err(e)
            }
        }
    }

    /// Attach uploaded media to a post. Failures are logged, never returned.
    pub async fn link_to_post(&self, media_ids: &[i32], post_id: i32) {
        if media_ids.is_empty() {
            return;
        }

        match self.media_repo.attach_to_post(media_ids, post_id).await {
            Ok(linked) if linked < media_ids.len() as u64 => {
                tracing::warn!(
                    post_id,
                    requested = media_ids.len(),
                    linked,
                    "Some media ids did not exist"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, post_id, ?media_ids, "Failed to link media to post");
            }
        }
    }

    /// Remove a post's media rows, then their files.
    ///
    /// Every file is attempted even after a failure; any failure fails the
    /// whole cleanup.
    pub async fn delete_for_post(&self, post_id: i32) -> AppResult<()> {
        let removed = self.media_repo.delete_by_post(post_id).await?;

        let mut failed = 0usize;
        for media in &removed {
            if let Err(e) = self.storage.delete(&media.file_path).await {
                failed += 1;
                tracing::error!(
                    error = %e,
                    post_id,
                    media_id = media.id,
                    file = %media.file_path,
                    "Failed to delete media file"
                );
            }
        }

        if failed > 0 {
            return Err(AppError::Storage(format!(
                "{failed} of {} media files of post {post_id} could not be removed",
                removed.len()
            )));
        }

        Ok(())
    }

    /// Attachment paths of each post, in media id order.
    pub async fn attachments_for_posts(
        &self,
        post_ids: &[i32],
    ) -> AppResult<HashMap<i32, Vec<String>>> {
        let mut by_post: HashMap<i32, Vec<String>> = HashMap::new();

        for media in self.media_repo.find_by_posts(post_ids).await? {
            if let Some(post_id) = media.post_id {
                by_post
                    .entry(post_id)
                    .or_default()
                    .push(self.attachment_path(&media.file_path));
            }
        }

        Ok(by_post)
    }

    /// Path of a stored file relative to the media-serving root.
    #[must_use]
    pub fn attachment_path(&self, file_path: &str) -> String {
        self.storage.public_path(file_path)
    }
}
