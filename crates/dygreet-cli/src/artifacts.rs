//! Per-target output artifacts.
//!
//! Profile and video JSON land in the output directory with a shared run
//! timestamp and a per-target processing index, so artifacts of one run sort
//! together. Greeting text files go to their own directory, named after the
//! sanitized nickname.

use std::path::{Path, PathBuf};

use chrono::Local;

use dygreet_core::safe_file_stem;
use dygreet_douyin::{ProfileRecord, VideoRecord};

pub(crate) struct ArtifactWriter {
    output_dir: PathBuf,
    talk_dir: PathBuf,
    stamp: String,
}

impl ArtifactWriter {
    pub(crate) fn new(output_dir: &Path, talk_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            talk_dir: talk_dir.to_path_buf(),
            stamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// Writes the profile JSON artifact and returns its path.
    pub(crate) fn write_profile(
        &self,
        index: usize,
        source_url: &str,
        profile: &ProfileRecord,
    ) -> anyhow::Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}_{index:03}_{}.json", self.stamp, safe_file_stem(&profile.nickname)));
        let body = serde_json::json!({
            "extraction_time": Local::now().to_rfc3339(),
            "source_url": source_url,
            "processing_index": index,
            "user_info": profile,
        });
        self.write_json(&path, &body)?;
        Ok(path)
    }

    /// Writes the video listing JSON artifact and returns its path.
    pub(crate) fn write_videos(
        &self,
        index: usize,
        profile: &ProfileRecord,
        videos: &[VideoRecord],
    ) -> anyhow::Result<PathBuf> {
        let path = self.output_dir.join(format!(
            "{}_{index:03}_{}_videos.json",
            self.stamp,
            safe_file_stem(&profile.nickname)
        ));
        let body = serde_json::json!({
            "extraction_time": Local::now().to_rfc3339(),
            "sec_user_id": profile.sec_user_id,
            "nickname": profile.nickname,
            "video_count": videos.len(),
            "videos": videos,
        });
        self.write_json(&path, &body)?;
        Ok(path)
    }

    /// Writes the greeting text file and returns its path.
    pub(crate) fn write_greeting(
        &self,
        profile: &ProfileRecord,
        greeting: &str,
    ) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.talk_dir)?;
        let path = self
            .talk_dir
            .join(format!("{}.txt", safe_file_stem(&profile.nickname)));
        let content = format!(
            "# 私信开场白\n# 用户: {}\n# 生成时间: {}\n\n{}\n",
            profile.nickname,
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            greeting.trim(),
        );
        std::fs::write(&path, content)?;
        Ok(path)
    }

    fn write_json(&self, path: &Path, body: &serde_json::Value) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::write(path, serde_json::to_string_pretty(body)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dygreet_douyin::ProfileSource;

    fn profile(nickname: &str) -> ProfileRecord {
        ProfileRecord {
            sec_user_id: "MS4wLjABAAAAtest".into(),
            nickname: nickname.into(),
            signature: "sig".into(),
            avatar_url: String::new(),
            ip_location: "广东".into(),
            follower_count: 10,
            following_count: 2,
            total_favorited: 100,
            aweme_count: 3,
            unique_id: "uid1".into(),
            source: ProfileSource::Primary,
        }
    }

    #[test]
    fn profile_artifact_carries_envelope_fields() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path(), dir.path());

        let path = writer
            .write_profile(7, "https://v.douyin.com/abc", &profile("小王"))
            .unwrap();

        assert!(path.file_name().unwrap().to_str().unwrap().contains("_007_"));
        let body: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(body["source_url"], "https://v.douyin.com/abc");
        assert_eq!(body["processing_index"], 7);
        assert_eq!(body["user_info"]["nickname"], "小王");
    }

    #[test]
    fn videos_artifact_lists_records() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path(), dir.path());

        let path = writer.write_videos(1, &profile("小王"), &[]).unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with("_videos.json"));
        let body: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(body["video_count"], 0);
    }

    #[test]
    fn greeting_file_is_named_after_the_sanitized_nickname() {
        let dir = tempfile::tempdir().unwrap();
        let talk = dir.path().join("talk");
        let writer = ArtifactWriter::new(dir.path(), &talk);

        let path = writer
            .write_greeting(&profile("名字/带斜杠"), "你好！")
            .unwrap();

        assert!(!path.file_name().unwrap().to_str().unwrap().contains('/'));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# 私信开场白"));
        assert!(content.ends_with("你好！\n"));
    }
}
