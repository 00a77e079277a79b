use super::recorder::DeviceError;

pub const EMPTY_TEXT_MESSAGE: &str = "الرجاء إدخال نص";
pub const TEXT_TOO_LONG_MESSAGE: &str = "النص يجب أن يكون أقل من 1000 حرف";
pub const OFFLINE_MESSAGE: &str = "لا يوجد اتصال بالإنترنت";
pub const UNPARSABLE_RESPONSE_MESSAGE: &str = "فشل في تحليل استجابة الخادم";
pub const UNKNOWN_ERROR_MESSAGE: &str = "خطأ غير معروف";
pub const UNSUPPORTED_FILE_MESSAGE: &str = "نوع الملف غير مدعوم";
pub const FILE_READ_MESSAGE: &str = "فشل قراءة الملف";

/// Failures surfaced to the user by the input assembler
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("نوع الملف غير مدعوم: {0}")]
    UnsupportedFileType(String),

    #[error("فشل قراءة الملف: {0}")]
    FileRead(String),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Relay { status: u16, message: String },

    #[error("جارٍ توليد الصوت بالفعل")]
    Busy,

    #[error("تم إلغاء توليد الصوت")]
    Cancelled,

    #[error("فشل حفظ الملف: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Text for the blocking alert shown to the user
    pub fn alert_text(&self) -> String {
        match self {
            Self::InvalidInput(msg) => msg.clone(),
            Self::UnsupportedFileType(_) | Self::FileRead(_) => {
                format!("خطأ في قراءة الملف: {}", self.file_reason())
            }
            Self::Device(e) => format!("خطأ في الوصول إلى الميكروفون: {e}"),
            Self::Network(_) | Self::Relay { .. } | Self::Busy | Self::Cancelled => {
                format!("خطأ في توليد الصوت: {self}")
            }
            Self::Io(e) => format!("خطأ في حفظ الملف: {e}"),
        }
    }

    fn file_reason(&self) -> &str {
        match self {
            Self::UnsupportedFileType(_) => UNSUPPORTED_FILE_MESSAGE,
            _ => FILE_READ_MESSAGE,
        }
    }
}
