use serde::{Serialize, Serializer};

/// API 响应中的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    AuthFailed = 1010,
    RegisterFailed = 1011,

    // 教师 2xxx
    TeacherNotFound = 2001,
    TeacherPhoneAlreadyExists = 2002,
    TeacherPhoneInvalid = 2003,
    TeacherNameInvalid = 2004,
    TeacherPasswordInvalid = 2005,
    TeacherUpdateFailed = 2006,
    PasswordChangeNotAllowed = 2007,

    // 管理员/检查员 21xx
    AdminNotFound = 2101,
    AdminUsernameAlreadyExists = 2102,
    AdminUsernameInvalid = 2103,
    AdminRoleInvalid = 2104,
    CanNotDeleteCurrentAdmin = 2105,
    CanNotDemoteCurrentAdmin = 2106,

    // 工作单位 3xxx
    JobNotFound = 3001,
    JobInvalid = 3002,

    // 成就类别 4xxx
    AchievementNotFound = 4001,
    AchievementInvalid = 4002,

    // 提交文件 6xxx
    FileNotFound = 6001,
    FileUploadFailed = 6002,
    FileTypeNotAllowed = 6003,
    FileSizeExceeded = 6004,
    MultifileUploadNotAllowed = 6005,
    FileStatusConflict = 6006,
    RatingInvalid = 6007,
    ReviewMessageRequired = 6008,

    InternalServerError = 9000,
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(*self as i32)
    }
}
