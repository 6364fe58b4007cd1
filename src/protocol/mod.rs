/*!
 * Storage backend protocols
 *
 * Only S3 and S3-compatible object stores are supported. The backend is
 * reached through the listing seam in [`crate::listing::PageSource`].
 */

pub mod s3;
