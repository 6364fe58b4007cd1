//! [`PageSource`] adapters over [`S3Client`]

use super::client::S3Client;
use crate::error::Result;
use crate::listing::{ObjectCursor, Page, PageSource, VersionCursor};
use async_trait::async_trait;

/// ListObjects pages for one bucket
pub struct ObjectPages<'a> {
    client: &'a S3Client,
    bucket: String,
    page_size: u32,
}

impl<'a> ObjectPages<'a> {
    pub fn new(client: &'a S3Client, bucket: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            page_size,
        }
    }
}

#[async_trait]
impl PageSource<ObjectCursor> for ObjectPages<'_> {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn fetch(&self, cursor: &ObjectCursor) -> Result<Page<ObjectCursor>> {
        let page = self
            .client
            .list_objects_page(&self.bucket, self.page_size, cursor.marker.as_deref())
            .await?;
        Ok(page)
    }
}

/// ListObjectVersions pages for one bucket
pub struct VersionPages<'a> {
    client: &'a S3Client,
    bucket: String,
    page_size: u32,
}

impl<'a> VersionPages<'a> {
    pub fn new(client: &'a S3Client, bucket: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            page_size,
        }
    }
}

#[async_trait]
impl PageSource<VersionCursor> for VersionPages<'_> {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn fetch(&self, cursor: &VersionCursor) -> Result<Page<VersionCursor>> {
        let page = self
            .client
            .list_versions_page(
                &self.bucket,
                self.page_size,
                cursor.key_marker.as_deref(),
                cursor.version_marker.as_deref(),
            )
            .await?;
        Ok(page)
    }
}
