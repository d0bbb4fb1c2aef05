//! Upstream error code → user-facing explanation.
//!
//! Lookup falls through three tiers: the upstream `code`, then the HTTP
//! status, then a generic pair.

/// Explanation shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guidance {
    pub detail: &'static str,
    pub solution: &'static str,
}

const fn guidance(detail: &'static str, solution: &'static str) -> Guidance {
    Guidance { detail, solution }
}

/// `invalid_param` raised because the workflow app was never published.
const UNPUBLISHED_SOLUTION: &str = "미소 앱 편집화면에서 저장 버튼을 눌러 발행해주세요.";
const UNPUBLISHED_MARKER: &str = "not published";

static BY_CODE: &[(&str, Guidance)] = &[
    (
        "invalid_param",
        guidance(
            "잘못된 파라미터가 전달되었습니다.",
            "입력 데이터를 확인 후 다시 시도해주세요.",
        ),
    ),
    (
        "app_unavailable",
        guidance(
            "앱(App) 설정 정보를 사용할 수 없습니다.",
            "미소 앱이 올바르게 설정되어 있는지 확인해주세요.",
        ),
    ),
    (
        "provider_not_initialize",
        guidance(
            "사용 가능한 모델 인증 정보가 없습니다.",
            "미소 플랫폼에서 모델 인증 설정을 확인해주세요.",
        ),
    ),
    (
        "provider_quota_exceeded",
        guidance(
            "모델 호출 쿼터(Quota)가 초과되었습니다.",
            "사용량 한도를 확인하고, 필요 시 쿼터를 증가시켜주세요.",
        ),
    ),
    (
        "model_currently_not_support",
        guidance(
            "현재 모델을 사용할 수 없습니다.",
            "다른 모델을 선택하거나, 잠시 후 다시 시도해주세요.",
        ),
    ),
    (
        "workflow_request_error",
        guidance(
            "워크플로우 실행에 실패했습니다.",
            "워크플로우 설정을 확인하고 다시 시도해주세요.",
        ),
    ),
];

static BY_STATUS: &[(u16, Guidance)] = &[
    (
        400,
        guidance(
            "MISO API 요청이 거부되었습니다.",
            "입력 데이터를 확인 후 다시 시도해주세요.",
        ),
    ),
    (
        500,
        guidance(
            "MISO 서버 내부 오류가 발생했습니다.",
            "잠시 후 다시 시도해주세요. 문제가 지속되면 관리자에게 문의하세요.",
        ),
    ),
];

pub const GENERIC: Guidance = guidance(
    "MISO API 호출 중 오류가 발생했습니다.",
    "잠시 후 다시 시도해주세요.",
);

pub const WORKFLOW_FAILED: Guidance = guidance(
    "워크플로우 실행 중 오류가 발생했습니다.",
    "입력 데이터를 확인한 후 다시 시도해주세요.",
);

pub const NETWORK: Guidance = guidance(
    "보고서 생성 요청 중 네트워크 오류가 발생했습니다.",
    "인터넷 연결을 확인하고 다시 시도해주세요.",
);

pub const MISSING_TEXT: Guidance = guidance(
    "보고서 생성에 필요한 텍스트 데이터가 누락되었습니다.",
    "대시보드 데이터를 올바르게 전달해주세요.",
);

/// Resolve the explanation for a failed upstream call.
///
/// The `invalid_param` branch inspects the upstream message for the English
/// phrase "not published". That wording belongs to the upstream service;
/// if it changes, unpublished apps fall back to the plain `invalid_param` pair.
pub fn classify(status: u16, code: Option<&str>, message: Option<&str>) -> Guidance {
    if let Some(code) = code {
        if let Some((_, found)) = BY_CODE.iter().find(|(c, _)| *c == code) {
            if code == "invalid_param"
                && message.map_or(false, |m| m.contains(UNPUBLISHED_MARKER))
            {
                return Guidance {
                    solution: UNPUBLISHED_SOLUTION,
                    ..*found
                };
            }
            return *found;
        }
    }

    BY_STATUS
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, g)| *g)
        .unwrap_or(GENERIC)
}
