use actix_multipart::{Field, Multipart};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::FileService;
use crate::config::AppConfig;
use crate::errors::PortfolioError;
use crate::models::{
    ApiResponse, ErrorCode,
    achievements::entities::Achievement,
    auth::entities::Principal,
    files::requests::NewFileRecord,
    teachers::entities::Teacher,
};
use crate::services::{forbidden, internal_error, require_principal};
use crate::utils::{MAGIC_HEAD_LEN, extension_of, validate_magic_bytes};

// 文本字段最大字节数
const MAX_TEXT_FIELD: usize = 4096;

/// 已写入磁盘的文件体；未 keep 时随作用域结束删除
struct StoredBody {
    path: PathBuf,
    keep: bool,
}

impl Drop for StoredBody {
    fn drop(&mut self) {
        if !self.keep
            && let Err(e) = fs::remove_file(&self.path)
        {
            tracing::warn!("Failed to clean up {}: {}", self.path.display(), e);
        }
    }
}

struct UploadedBody {
    body: StoredBody,
    stored_name: String,
    original_name: String,
    extension: String,
    size: i64,
}

fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

async fn read_text_field(field: &mut Field) -> Result<String, HttpResponse> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| bad_request(ErrorCode::BadRequest, format!("{e}")))?;
        if buf.len() + data.len() > MAX_TEXT_FIELD {
            return Err(bad_request(ErrorCode::BadRequest, "Form field is too long"));
        }
        buf.extend_from_slice(&data);
    }
    String::from_utf8(buf).map_err(|_| bad_request(ErrorCode::BadRequest, "Form field must be UTF-8"))
}

/// 累积文件头，凑够魔术字节长度后再校验
#[derive(Default)]
struct HeadSniffer {
    head: Vec<u8>,
    passed: bool,
}

impl HeadSniffer {
    /// 返回当前可以写盘的数据；文件头与扩展名不符时返回 None
    fn feed<'a>(&'a mut self, data: &'a [u8], extension: &str) -> Option<&'a [u8]> {
        if self.passed {
            return Some(data);
        }
        self.head.extend_from_slice(data);
        if self.head.len() < MAGIC_HEAD_LEN {
            return Some(<&[u8]>::default());
        }
        self.passed = validate_magic_bytes(&self.head, extension);
        self.passed.then_some(self.head.as_slice())
    }

    /// 流结束时处理不足魔术字节长度的短文件
    fn finish(&mut self, extension: &str) -> Option<&[u8]> {
        if self.passed {
            return Some(<&[u8]>::default());
        }
        self.passed = validate_magic_bytes(&self.head, extension);
        self.passed.then_some(self.head.as_slice())
    }
}

fn magic_mismatch() -> HttpResponse {
    bad_request(
        ErrorCode::FileTypeNotAllowed,
        "File content does not match its extension",
    )
}

fn write_chunk(f: &mut File, data: &[u8]) -> Result<(), HttpResponse> {
    if data.is_empty() {
        return Ok(());
    }
    f.write_all(data).map_err(|e| {
        tracing::error!("{}", PortfolioError::from(e));
        internal_error("Failed to write file".to_string())
    })
}

/// 流式写入文件体，同时校验扩展名、魔术字节与大小
async fn store_body(field: &mut Field, upload_dir: &Path) -> Result<UploadedBody, HttpResponse> {
    let config = AppConfig::get();

    let original_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(|s| s.to_string())
        .unwrap_or_default();

    let extension = extension_of(&original_name).unwrap_or_default();
    if !config
        .upload
        .allowed_types
        .iter()
        .any(|t| t.to_lowercase() == extension)
    {
        return Err(bad_request(ErrorCode::FileTypeNotAllowed, "File type not allowed"));
    }

    let stored_name = format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp(),
        Uuid::new_v4(),
        extension
    );
    let path = upload_dir.join(&stored_name);
    let mut f = File::create(&path).map_err(|e| {
        tracing::error!("{}", PortfolioError::from(e));
        internal_error("Failed to create file".to_string())
    })?;
    let body = StoredBody { path, keep: false };

    let mut sniffer = HeadSniffer::default();
    let mut total_size: usize = 0;
    while let Some(chunk) = field.next().await {
        let data = chunk.map_err(|e| bad_request(ErrorCode::FileUploadFailed, format!("{e}")))?;

        total_size += data.len();
        if total_size > config.upload.max_size {
            return Err(bad_request(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit",
            ));
        }

        let ready = sniffer
            .feed(&data, &extension)
            .ok_or_else(magic_mismatch)?;
        write_chunk(&mut f, ready)?;
    }

    if total_size == 0 {
        return Err(bad_request(ErrorCode::FileUploadFailed, "Uploaded file is empty"));
    }
    let rest = sniffer.finish(&extension).ok_or_else(magic_mismatch)?;
    write_chunk(&mut f, rest)?;

    Ok(UploadedBody {
        body,
        stored_name,
        original_name,
        extension,
        size: total_size as i64,
    })
}

/// 表单中的文本字段
#[derive(Debug, PartialEq)]
pub(crate) struct UploadForm {
    pub title: String,
    pub job_id: i64,
    pub achievement_id: i64,
    pub rating_title: String,
    pub rating: Option<f64>,
}

impl UploadForm {
    pub(crate) fn parse(fields: &HashMap<String, String>) -> Result<Self, String> {
        let text = |name: &str| {
            fields
                .get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("Field '{name}' is required"))
        };
        let id = |name: &str| {
            text(name)?
                .parse::<i64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or_else(|| format!("Field '{name}' must be a positive integer"))
        };

        let rating = match fields.get("rating").map(|v| v.trim()).filter(|v| !v.is_empty()) {
            None => None,
            Some(raw) => Some(
                raw.parse::<f64>()
                    .ok()
                    .filter(|r| r.is_finite() && *r >= 0.0)
                    .ok_or_else(|| "Field 'rating' must be a non-negative number".to_string())?,
            ),
        };

        Ok(Self {
            title: text("title")?,
            job_id: id("job_id")?,
            achievement_id: id("achievement_id")?,
            rating_title: text("rating_title")?,
            rating,
        })
    }
}

/// 按成就类别的评分项确定申报分值
///
/// 未填写时取评分项的分值；填写时不得超过评分项分值。
pub(crate) fn resolve_claimed_rating(
    achievement: &Achievement,
    rating_title: &str,
    rating: Option<f64>,
) -> Result<(String, f64), String> {
    let option = achievement
        .find_rating(rating_title)
        .ok_or_else(|| format!("'{rating_title}' is not a rating of this achievement"))?;

    let claimed = match (rating, option.rating) {
        (Some(r), Some(max)) if r > max => {
            return Err(format!("Rating {r} exceeds the maximum of {max}"));
        }
        (Some(r), _) => r,
        (None, Some(max)) => max,
        (None, None) => return Err("Field 'rating' is required for this entry".to_string()),
    };

    Ok((option.about.trim().to_string(), claimed))
}

pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let principal = match require_principal(req) {
        Ok(p) => p,
        Err(resp) => return Ok(resp),
    };
    let teacher: Teacher = match principal {
        Principal::Teacher(t) => t,
        Principal::Admin(_) => return Ok(forbidden("Only teachers can upload files")),
    };

    let upload_dir = PathBuf::from(&AppConfig::get().upload.dir);
    if let Err(e) = fs::create_dir_all(&upload_dir) {
        tracing::error!("{}", PortfolioError::file_operation(format!("{e}")));
        return Ok(internal_error("Failed to create upload directory".to_string()));
    }

    let mut uploaded: Option<UploadedBody> = None;
    let mut fields: HashMap<String, String> = HashMap::new();

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Ok(bad_request(ErrorCode::FileUploadFailed, format!("{e}"))),
        };

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if uploaded.is_some() {
                    return Ok(bad_request(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    ));
                }
                match store_body(&mut field, &upload_dir).await {
                    Ok(body) => uploaded = Some(body),
                    Err(resp) => return Ok(resp),
                }
            }
            "title" | "job_id" | "achievement_id" | "rating_title" | "rating" => {
                match read_text_field(&mut field).await {
                    Ok(value) => {
                        fields.insert(name, value);
                    }
                    Err(resp) => return Ok(resp),
                }
            }
            // 未知字段丢弃
            _ => {
                while let Some(Ok(_)) = field.next().await {}
            }
        }
    }

    let Some(mut uploaded) = uploaded else {
        return Ok(bad_request(ErrorCode::FileUploadFailed, "No file found in upload payload"));
    };

    let form = match UploadForm::parse(&fields) {
        Ok(form) => form,
        Err(msg) => return Ok(bad_request(ErrorCode::BadRequest, msg)),
    };

    let storage = service.get_storage(req);

    // 快照取存储层的最新资料，缓存中的主体可能已过时
    let teacher = match storage.get_teacher_by_id(teacher.id).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TeacherNotFound,
                "Teacher not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Failed to retrieve teacher: {e}"))),
    };

    let job = match storage.get_job_by_id(form.job_id).await {
        Ok(Some(job)) if job.teacher_id == teacher.id => job,
        Ok(Some(_)) => return Ok(forbidden("The job does not belong to you")),
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::JobNotFound,
                "Job not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Failed to retrieve job: {e}"))),
    };

    let achievement = match storage.get_achievement_by_id(form.achievement_id).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AchievementNotFound,
                "Achievement not found",
            )));
        }
        Err(e) => return Ok(internal_error(format!("Failed to retrieve achievement: {e}"))),
    };

    let (rating_title, rating) =
        match resolve_claimed_rating(&achievement, &form.rating_title, form.rating) {
            Ok(resolved) => resolved,
            Err(msg) => return Ok(bad_request(ErrorCode::RatingInvalid, msg)),
        };

    let record = NewFileRecord {
        title: form.title,
        stored_name: uploaded.stored_name.clone(),
        original_name: uploaded.original_name.clone(),
        file_size: uploaded.size,
        file_type: uploaded.extension.clone(),
        teacher_id: teacher.id,
        teacher_first_name: teacher.first_name,
        teacher_last_name: teacher.last_name,
        job_id: job.id,
        job_title: job.title,
        job_workplace: job.workplace,
        region: job.region,
        achievement_id: achievement.id,
        achievement_title: achievement.title,
        achievement_section: achievement.section,
        rating_title,
        rating,
    };

    match storage.create_file(record).await {
        Ok(file) => {
            uploaded.body.keep = true;
            tracing::info!("Teacher {} uploaded file {}", teacher.id, file.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(file, "File uploaded successfully")))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            format!("Failed to save file: {e}"),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::achievements::entities::RatingOption;
    use chrono::Utc;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn achievement() -> Achievement {
        Achievement {
            id: 1,
            section: "Olympiads".to_string(),
            title: "Student winners".to_string(),
            ratings: vec![
                RatingOption {
                    about: "Regional".to_string(),
                    rating: Some(5.0),
                },
                RatingOption {
                    about: "Other".to_string(),
                    rating: None,
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_form() {
        let parsed = UploadForm::parse(&form(&[
            ("title", " Diploma "),
            ("job_id", "3"),
            ("achievement_id", "7"),
            ("rating_title", "Regional"),
        ]))
        .unwrap();
        assert_eq!(parsed.title, "Diploma");
        assert_eq!((parsed.job_id, parsed.achievement_id), (3, 7));
        assert_eq!(parsed.rating, None);
    }

    #[test]
    fn test_parse_form_errors() {
        let missing = UploadForm::parse(&form(&[("job_id", "3")])).unwrap_err();
        assert_eq!(missing, "Field 'title' is required");

        let bad_id = UploadForm::parse(&form(&[
            ("title", "x"),
            ("job_id", "-1"),
            ("achievement_id", "7"),
            ("rating_title", "Regional"),
        ]))
        .unwrap_err();
        assert!(bad_id.contains("job_id"));
    }

    #[test]
    fn test_rating_defaults_to_entry() {
        assert_eq!(
            resolve_claimed_rating(&achievement(), " Regional", None),
            Ok(("Regional".to_string(), 5.0))
        );
        assert_eq!(
            resolve_claimed_rating(&achievement(), "Regional", Some(3.0)).map(|r| r.1),
            Ok(3.0)
        );
    }

    #[test]
    fn test_rating_errors() {
        assert!(resolve_claimed_rating(&achievement(), "National", None).is_err());
        assert!(resolve_claimed_rating(&achievement(), "Regional", Some(6.0)).is_err());
        assert!(resolve_claimed_rating(&achievement(), "Other", None).is_err());
        assert_eq!(
            resolve_claimed_rating(&achievement(), "Other", Some(2.0)).map(|r| r.1),
            Ok(2.0)
        );
    }

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_head_split_across_chunks() {
        let mut sniffer = HeadSniffer::default();
        assert_eq!(sniffer.feed(&PNG[..3], ".png"), Some(&[][..]));
        assert_eq!(sniffer.feed(&PNG[3..], ".png"), Some(&PNG[..]));
        assert_eq!(sniffer.feed(b"IHDR", ".png"), Some(&b"IHDR"[..]));
        assert_eq!(sniffer.finish(".png"), Some(&[][..]));
    }

    #[test]
    fn test_head_mismatch_after_split() {
        let mut sniffer = HeadSniffer::default();
        assert!(sniffer.feed(&PNG[..2], ".png").is_some());
        assert!(sniffer.feed(b"not a png", ".png").is_none());
    }

    #[test]
    fn test_short_file_checked_on_finish() {
        let mut sniffer = HeadSniffer::default();
        assert_eq!(sniffer.feed(&[0xFF, 0xD8], ".jpg"), Some(&[][..]));
        assert_eq!(sniffer.feed(&[0xFF], ".jpg"), Some(&[][..]));
        assert_eq!(sniffer.finish(".jpg"), Some(&[0xFF, 0xD8, 0xFF][..]));

        let mut sniffer = HeadSniffer::default();
        sniffer.feed(b"%PD", ".pdf");
        assert!(sniffer.finish(".pdf").is_none());
    }

    fn multipart_payload(fields: &[(&str, &str)], file_name: &str, body: &[u8]) -> Multipart {
        use actix_web::http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
        use actix_web::web::Bytes;

        let boundary = "portfolio-boundary";
        let mut raw = Vec::new();
        for (name, value) in fields {
            raw.extend_from_slice(
                format!(
                    "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        raw.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        raw.extend_from_slice(body);
        raw.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}")).unwrap(),
        );
        let stream = futures_util::stream::once(async move {
            Ok::<_, actix_web::error::PayloadError>(Bytes::from(raw))
        });
        Multipart::new(&headers, stream)
    }

    #[tokio::test]
    async fn test_upload_to_foreign_job_is_forbidden() {
        use crate::services::test_support::{
            achievement as stored_achievement, job, request_as, storage, teacher,
        };
        use actix_web::http::StatusCode;

        let storage = storage().await;
        let owner = teacher(&storage, "+998901112233").await;
        let intruder = teacher(&storage, "+998907778899").await;
        let job = job(&storage, owner.id, Some("Tashkent")).await;
        let achievement = stored_achievement(&storage).await;

        let mut body = PNG.to_vec();
        body.extend_from_slice(b"IHDR....");
        let job_id = job.id.to_string();
        let achievement_id = achievement.id.to_string();
        let payload = multipart_payload(
            &[
                ("title", "Regional olympiad"),
                ("job_id", &job_id),
                ("achievement_id", &achievement_id),
                ("rating_title", "Regional"),
            ],
            "diploma.png",
            &body,
        );

        let req = request_as(&storage, Principal::Teacher(intruder.clone()));
        let resp = FileService::new_lazy()
            .handle_upload(&req, payload)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(storage.list_files_by_teacher(intruder.id).await.unwrap().is_empty());
        assert!(storage.list_files_by_teacher(owner.id).await.unwrap().is_empty());
    }

}
