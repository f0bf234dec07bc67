/*!
 * 速率限制中间件
 *
 * 限制登录、刷新令牌与照片上传的请求频率，用于阻挡对登录 key 的暴力枚举。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())  // 5次/分钟
 *     .route(web::post().to(login))
 * ```
 *
 * - 已认证请求按用户 ID 计数，其余按客户端 IP 计数
 * - 固定时间窗口，窗口结束后计数清零
 * - 超过限制返回 429，并带上 Retry-After
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 单个限制键的计数窗口
#[derive(Debug, Clone, Copy)]
struct RateWindow {
    started: Instant,
    count: u32,
}

/// 全局计数缓存，键为 `前缀:user:ID` 或 `前缀:ip:地址`
static RATE_LIMIT_CACHE: Lazy<Cache<String, RateWindow>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点限制：5次/分钟/IP
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 刷新令牌限制：10次/分钟/IP
    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 照片上传限制：30次/分钟/用户
    pub fn photo_upload() -> Self {
        Self::new(30, 60).with_prefix("upload")
    }
}

/// 判定结果
#[derive(Debug, PartialEq, Eq)]
enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: u64 },
}

/// 在缓存中为 key 计数一次
async fn hit(
    cache: &Cache<String, RateWindow>,
    key: &str,
    max_requests: u32,
    window: Duration,
    now: Instant,
) -> Decision {
    let current = cache
        .get(key)
        .await
        .filter(|w| now.duration_since(w.started) < window);

    let window_state = match current {
        Some(w) if w.count >= max_requests => {
            let elapsed = now.duration_since(w.started);
            let retry_after = window.saturating_sub(elapsed).as_secs().max(1);
            return Decision::Limited { retry_after };
        }
        Some(w) => RateWindow {
            started: w.started,
            count: w.count + 1,
        },
        None => RateWindow {
            started: now,
            count: 1,
        },
    };

    cache.insert(key.to_string(), window_state).await;
    Decision::Allowed {
        remaining: max_requests.saturating_sub(window_state.count),
    }
}

/// 从请求中提取客户端 IP
///
/// 部署在反向代理之后时依赖代理写入的 X-Forwarded-For / X-Real-IP，
/// 格式不合法的头会被忽略。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window: Duration::from_secs(self.window_secs),
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window: Duration,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let max_requests = self.max_requests;
        let window = self.window;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let identifier = req
                .extensions()
                .get::<User>()
                .map(|user| format!("user:{}", user.id))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if key_prefix.is_empty() {
                identifier
            } else {
                format!("{key_prefix}:{identifier}")
            };

            match hit(&RATE_LIMIT_CACHE, &cache_key, max_requests, window, Instant::now()).await
            {
                Decision::Limited { retry_after } => {
                    warn!("Rate limit exceeded for key: {} (max {})", cache_key, max_requests);
                    Ok(req.into_response(
                        create_rate_limit_response(retry_after).map_into_right_body(),
                    ))
                }
                Decision::Allowed { remaining } => {
                    let mut res = srv.call(req).await?;
                    res.headers_mut().insert(
                        HeaderName::from_static("x-ratelimit-remaining"),
                        HeaderValue::from(remaining),
                    );
                    Ok(res.map_into_left_body())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let upload = RateLimit::photo_upload();
        assert_eq!(upload.key_prefix, "upload");
    }

    #[tokio::test]
    async fn test_window_limits_then_resets() {
        let cache = Cache::builder().max_capacity(10).build();
        let window = Duration::from_secs(60);
        let start = Instant::now();

        assert_eq!(
            hit(&cache, "k", 2, window, start).await,
            Decision::Allowed { remaining: 1 }
        );
        assert_eq!(
            hit(&cache, "k", 2, window, start).await,
            Decision::Allowed { remaining: 0 }
        );
        assert!(matches!(
            hit(&cache, "k", 2, window, start + Duration::from_secs(10)).await,
            Decision::Limited { retry_after: 50 }
        ));

        // 新窗口重新计数
        assert_eq!(
            hit(&cache, "k", 2, window, start + Duration::from_secs(61)).await,
            Decision::Allowed { remaining: 1 }
        );
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = Cache::builder().max_capacity(10).build();
        let window = Duration::from_secs(60);
        let now = Instant::now();

        hit(&cache, "a", 1, window, now).await;
        assert!(matches!(
            hit(&cache, "a", 1, window, now).await,
            Decision::Limited { .. }
        ));
        assert_eq!(
            hit(&cache, "b", 1, window, now).await,
            Decision::Allowed { remaining: 0 }
        );
    }
}
