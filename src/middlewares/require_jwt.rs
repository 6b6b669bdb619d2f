/*!
 * JWT 认证中间件
 *
 * 令牌由外部认证服务签发，这里只校验签名与有效期，再按令牌中的
 * 用户名与角色在对应账号分区中解析账号。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/api/v1/assignments")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_assignments))
 * ```
 *
 * 处理程序中提取账号：
 *
 * ```rust,ignore
 * let account = RequireJWT::extract_account(&req);
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 校验令牌，`sub` 为用户名，`role` 为 admin / employee / intern
 * 3. 先查会话缓存，未命中时经账号目录解析并写回缓存
 * 4. 账号存入请求扩展；任一步失败返回 401
 */

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info};

use super::create_error_response;
use crate::cache::{ObjectCache, get_json, insert_json};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::accounts::entities::{Account, AccountInfo, Role};
use crate::utils::jwt::{Claims, JwtUtils};
use crate::workflow::AccountDirectory;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 会话缓存的存活时间不超过令牌剩余有效期
fn session_ttl(claims: &Claims, default_ttl: u64) -> u64 {
    let remaining = (claims.exp as i64 - chrono::Utc::now().timestamp()).max(1) as u64;
    remaining.min(default_ttl.max(1))
}

async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Account, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;
    let role = claims
        .role
        .parse::<Role>()
        .map_err(|_| format!("Unknown role in JWT: '{}'", claims.role))?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Cache not configured".to_string())?;

    let key = format!("session:{token}");
    if let Some(account) = get_json::<Account>(cache.as_ref(), &key).await {
        return Ok(account);
    }

    let directory = req
        .app_data::<web::Data<AccountDirectory>>()
        .ok_or_else(|| "Account directory not configured".to_string())?;
    let account = directory
        .resolve_as(&claims.sub, role)
        .await
        .map_err(|e| {
            info!("Failed to resolve account {}: {}", claims.sub, e);
            "Failed to retrieve account".to_string()
        })?
        .ok_or_else(|| "Account not found".to_string())?;

    let ttl = session_ttl(&claims, AppConfig::get().cache.default_ttl);
    insert_json(cache.as_ref(), &key, &account, ttl).await;

    Ok(account)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(account) => {
                    debug!("JWT authentication successful for {}", account.username());
                    req.extensions_mut().insert(account);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取已认证账号
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_account(req: &actix_web::HttpRequest) -> Option<Account> {
        req.extensions().get::<Account>().cloned()
    }

    pub fn extract_username(req: &actix_web::HttpRequest) -> Option<String> {
        req.extensions()
            .get::<Account>()
            .map(|account| account.username().to_string())
    }
}
