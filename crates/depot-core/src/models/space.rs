use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::file::{FileKind, FileRecord};

/// Usage for one file kind on the quota dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct KindUsage {
    pub size_bytes: i64,
    /// Most recent update among the owner's files of this kind.
    pub latest: Option<DateTime<Utc>>,
}

impl KindUsage {
    fn add(&mut self, record: &FileRecord) {
        self.size_bytes += record.size_bytes;
        if self.latest.is_none_or(|latest| record.updated_at > latest) {
            self.latest = Some(record.updated_at);
        }
    }
}

/// Per-kind and total space usage for one owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpaceUsage {
    pub image: KindUsage,
    pub document: KindUsage,
    pub video: KindUsage,
    pub audio: KindUsage,
    pub other: KindUsage,
    pub used_bytes: i64,
    pub total_bytes: i64,
}

impl SpaceUsage {
    pub fn from_records(records: &[FileRecord], total_bytes: i64) -> Self {
        let mut usage = SpaceUsage {
            image: KindUsage::default(),
            document: KindUsage::default(),
            video: KindUsage::default(),
            audio: KindUsage::default(),
            other: KindUsage::default(),
            used_bytes: 0,
            total_bytes,
        };
        for record in records {
            usage.kind_mut(record.kind).add(record);
            usage.used_bytes += record.size_bytes;
        }
        usage
    }

    fn kind_mut(&mut self, kind: FileKind) -> &mut KindUsage {
        match kind {
            FileKind::Image => &mut self.image,
            FileKind::Document => &mut self.document,
            FileKind::Video => &mut self.video,
            FileKind::Audio => &mut self.audio,
            FileKind::Other => &mut self.other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file::BlobRef;
    use uuid::Uuid;

    fn record(name: &str, size_bytes: i64, updated_at: DateTime<Utc>) -> FileRecord {
        let (kind, extension) = FileKind::from_filename(name);
        FileRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            extension,
            size_bytes,
            url: "http://localhost/blob".to_string(),
            owner: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            users: vec![],
            blob_ref: BlobRef::new("files", Uuid::new_v4()),
            created_at: updated_at,
            updated_at,
        }
    }

    #[test]
    fn test_space_usage_sums_per_kind() {
        let earlier = Utc::now() - chrono::Duration::hours(1);
        let later = Utc::now();
        let records = vec![
            record("a.png", 100, earlier),
            record("b.jpg", 50, later),
            record("c.pdf", 200, earlier),
            record("d.bin", 25, earlier),
        ];

        let usage = SpaceUsage::from_records(&records, 1000);

        assert_eq!(usage.image.size_bytes, 150);
        assert_eq!(usage.image.latest, Some(later));
        assert_eq!(usage.document.size_bytes, 200);
        assert_eq!(usage.other.size_bytes, 25);
        assert_eq!(usage.video.size_bytes, 0);
        assert!(usage.video.latest.is_none());
        assert_eq!(usage.used_bytes, 375);
        assert_eq!(usage.total_bytes, 1000);
    }
}
