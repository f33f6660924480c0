use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{careerdb::CareerExt, userdb::UserExt},
    dtos::{careerdtos::*, userdtos::FilterUserDto},
    error::{ErrorMessage, HttpError},
    mail::mails::{notify_admins, send_offer_response_email, send_project_offer_email},
    middleware::{auth, role_check, JWTAuthMiddeware},
    models::careermodels::{ApplicationStatus, OfferStatus, ProjectStatus},
    models::usermodel::UserRole,
    AppState,
};

pub fn careers_handler() -> Router {
    let admin_routes = Router::new()
        .route("/applications", get(list_applications))
        .route("/applications/:id", get(get_application))
        .route("/applications/:id/review", put(review_application))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
        .layer(middleware::from_fn(auth));

    Router::new()
        .route("/home", get(home))
        .route("/apply", post(submit_application))
        .route("/freelancers", get(list_freelancers))
        .route("/freelancers/:profile_id", get(freelancer_detail))
        .route("/projects", get(list_projects))
        .route("/projects/:slug", get(project_detail))
        .route("/projects/:slug/offers", post(submit_offer))
        .route(
            "/projects/new",
            post(create_project).layer(middleware::from_fn(auth)),
        )
        .route(
            "/my/projects/:slug/offers",
            get(list_offers).layer(middleware::from_fn(auth)),
        )
        .route(
            "/offers/:offer_id/respond",
            put(respond_to_offer).layer(middleware::from_fn(auth)),
        )
        .route(
            "/offers/:offer_id/withdraw",
            put(withdraw_offer)
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Admin])
                }))
                .layer(middleware::from_fn(auth)),
        )
        .nest("/admin", admin_routes)
}

/// Landing page aggregates: featured profiles and projects plus site totals.
pub async fn home(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let featured_freelancers = app_state
        .db_client
        .featured_freelancers(6)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let featured_projects = app_state
        .db_client
        .featured_projects(6)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let recent_projects = app_state
        .db_client
        .list_projects(None, None, None, "created_at", 6, 0)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let categories = app_state
        .db_client
        .get_project_categories(8)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_freelancers = app_state
        .db_client
        .verified_freelancer_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_projects = app_state
        .db_client
        .published_project_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let total_offers = app_state
        .db_client
        .total_offer_count()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(HomeResponseDto {
        status: "success".to_string(),
        featured_freelancers,
        featured_projects,
        recent_projects,
        categories,
        total_freelancers,
        total_projects,
        total_offers,
    }))
}

pub async fn list_freelancers(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<FreelancerListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(12);
    let offset = (page - 1) * limit;

    let freelancers = app_state
        .db_client
        .list_freelancers(
            query.search.as_deref(),
            query.city.as_deref(),
            query.min_experience,
            query.available_only.unwrap_or(false),
            query.sort.as_deref().unwrap_or("rating"),
            limit as i64,
            offset as i64,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = freelancers.len();

    Ok(Json(FreelancerListResponseDto {
        status: "success".to_string(),
        freelancers,
        results,
    }))
}

pub async fn freelancer_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let profile = app_state
        .db_client
        .get_freelancer_profile_by_id(profile_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Freelancer not found"))?;

    // Unverified profiles are not public.
    if !profile.is_verified {
        return Err(HttpError::not_found("Freelancer not found"));
    }

    let user = app_state
        .db_client
        .get_user(Some(profile.user_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Freelancer not found"))?;

    let projects = app_state
        .db_client
        .list_projects_by_freelancer(profile.user_id, true, 12)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let skills = profile.skills_list();

    Ok(Json(serde_json::json!({
        "status": "success",
        "profile": profile,
        "skills": skills,
        "user": FilterUserDto::filter_user(&user),
        "projects": projects,
    })))
}

pub async fn list_projects(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ProjectListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(12);
    let offset = (page - 1) * limit;

    let projects = app_state
        .db_client
        .list_projects(
            query.search.as_deref(),
            query.category.as_deref(),
            query.budget,
            query.sort.as_deref().unwrap_or("featured"),
            limit as i64,
            offset as i64,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let categories = app_state
        .db_client
        .get_project_categories(50)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = projects.len();

    Ok(Json(ProjectListResponseDto {
        status: "success".to_string(),
        projects,
        categories,
        results,
    }))
}

pub async fn project_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let project = app_state
        .db_client
        .get_project_by_slug(&slug, true)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    // Every detail view counts; the background sync corrects drift.
    app_state
        .db_client
        .increment_project_views(project.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let category = match project.category_id {
        Some(category_id) => app_state
            .db_client
            .get_project_categories(100)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .into_iter()
            .find(|c| c.id == category_id),
        None => None,
    };

    let similar_projects = app_state
        .db_client
        .similar_projects(project.id, project.category_id, 4)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ProjectDetailResponseDto {
        status: "success".to_string(),
        project,
        category,
        similar_projects,
    }))
}

pub async fn create_project(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateProjectDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if !user.user.is_freelancer() && !user.user.is_admin() {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    let profile = app_state
        .db_client
        .get_freelancer_profile(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::bad_request("Set up your freelancer profile before posting projects")
        })?;

    if !profile.is_verified && !user.user.is_admin() {
        return Err(HttpError::new(
            "Only verified freelancers can publish projects".to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    let category_id = match body.category_slug.as_deref() {
        Some(slug) => Some(
            app_state
                .db_client
                .get_project_category_by_slug(slug)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?
                .ok_or_else(|| HttpError::bad_request("Unknown project category"))?
                .id,
        ),
        None => None,
    };

    // Projects go live immediately unless explicitly kept as a draft.
    let status = if body.publish.unwrap_or(true) {
        ProjectStatus::Published
    } else {
        ProjectStatus::Draft
    };

    let project = app_state
        .db_client
        .create_project(
            user.user.id,
            category_id,
            body.title,
            body.description,
            body.technologies,
            body.requirements,
            body.deliverables,
            body.estimated_duration,
            body.budget_range,
            status,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let technologies = project.technologies_list();

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponseDto {
            status: "success".to_string(),
            data: ProjectData {
                project,
                technologies,
            },
        }),
    ))
}

/// Public: prospective clients submit offers without an account.
pub async fn submit_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(slug): Path<String>,
    Json(body): Json<SubmitOfferDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let project = app_state
        .db_client
        .get_project_by_slug(&slug, true)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    let offer = app_state
        .db_client
        .create_project_offer(
            project.id,
            body.client_name.clone(),
            body.client_email,
            body.client_phone,
            body.company_name,
            body.offer_amount.clone(),
            body.message,
            body.timeline,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    app_state
        .db_client
        .recount_project_offers(project.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Notify the project owner and any configured admins.
    if let Ok(Some(owner)) = app_state
        .db_client
        .get_user(Some(project.freelancer_id), None, None)
        .await
    {
        let config = app_state.env.clone();
        let project_title = project.title.clone();
        let client_name = body.client_name.clone();
        let amount = body.offer_amount.to_string();
        tokio::spawn(async move {
            if let Err(e) = send_project_offer_email(
                &config,
                &owner.email,
                &owner.full_name(),
                &project_title,
                &client_name,
                &amount,
            )
            .await
            {
                tracing::warn!("Offer notification to {} failed: {}", owner.email, e);
            }

            notify_admins(&config, |admin_email| {
                let config = config.clone();
                let project_title = project_title.clone();
                let client_name = client_name.clone();
                let amount = amount.clone();
                async move {
                    send_project_offer_email(
                        &config,
                        &admin_email,
                        "Admin",
                        &project_title,
                        &client_name,
                        &amount,
                    )
                    .await
                }
            })
            .await;
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(OfferResponseDto {
            status: "success".to_string(),
            offer,
        }),
    ))
}

/// Public: anyone can apply to join the site as a freelancer. The
/// application sits in the admin queue until it is reviewed.
pub async fn submit_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SubmitApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state
        .db_client
        .create_freelancer_application(
            body.full_name,
            body.email,
            body.phone,
            body.city,
            body.title,
            body.experience_years,
            body.skill_level,
            body.skills,
            body.portfolio_url,
            body.github_url,
            body.linkedin_url,
            body.cv_url,
            body.cover_letter,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponseDto {
            status: "success".to_string(),
            application,
        }),
    ))
}

pub async fn list_applications(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ApplicationListQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);
    let offset = (page - 1) * limit;

    let applications = app_state
        .db_client
        .list_freelancer_applications(query.status, limit as i64, offset as i64)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = app_state
        .db_client
        .count_freelancer_applications(query.status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApplicationListResponseDto {
        status: "success".to_string(),
        applications,
        results,
    }))
}

pub async fn get_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let application = app_state
        .db_client
        .get_freelancer_application(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Application not found"))?;

    Ok(Json(ApplicationResponseDto {
        status: "success".to_string(),
        application,
    }))
}

pub async fn review_application(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewApplicationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state
        .db_client
        .get_freelancer_application(id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Application not found"))?;

    if application.status != ApplicationStatus::Pending {
        return Err(HttpError::bad_request(
            "This application has already been reviewed".to_string(),
        ));
    }

    let status = if body.approve {
        ApplicationStatus::Approved
    } else {
        ApplicationStatus::Rejected
    };

    let application = app_state
        .db_client
        .review_freelancer_application(id, status, body.reviewer_notes)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(ApplicationResponseDto {
        status: "success".to_string(),
        application,
    }))
}

pub async fn list_offers(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let project = app_state
        .db_client
        .get_project_by_slug(&slug, false)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    if project.freelancer_id != user.user.id && !user.user.is_admin() {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    let offers = app_state
        .db_client
        .list_project_offers(project.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let results = offers.len();

    Ok(Json(OfferListResponseDto {
        status: "success".to_string(),
        offers,
        results,
    }))
}

pub async fn respond_to_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(offer_id): Path<Uuid>,
    Json(body): Json<RespondOfferDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let offer = app_state
        .db_client
        .get_project_offer(offer_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Offer not found"))?;

    let project = app_state
        .db_client
        .get_project_by_id(offer.project_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Project not found"))?;

    if project.freelancer_id != user.user.id && !user.user.is_admin() {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            StatusCode::FORBIDDEN,
        ));
    }

    if offer.status != OfferStatus::Pending {
        return Err(HttpError::bad_request(
            "This offer has already been responded to".to_string(),
        ));
    }

    let status = if body.accept {
        OfferStatus::Accepted
    } else {
        OfferStatus::Rejected
    };

    let offer = app_state
        .db_client
        .respond_to_project_offer(offer_id, status, body.response_message.clone())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let config = app_state.env.clone();
    let client_email = offer.client_email.clone();
    let client_name = offer.client_name.clone();
    let project_title = project.title.clone();
    let accepted = body.accept;
    let response_message = body.response_message.clone();
    tokio::spawn(async move {
        if let Err(e) = send_offer_response_email(
            &config,
            &client_email,
            &client_name,
            &project_title,
            accepted,
            response_message.as_deref(),
        )
        .await
        {
            tracing::warn!("Offer response email to {} failed: {}", client_email, e);
        }
    });

    Ok(Json(OfferResponseDto {
        status: "success".to_string(),
        offer,
    }))
}

/// Admins mark an offer withdrawn on the client's behalf; offer clients have
/// no account to do it themselves.
pub async fn withdraw_offer(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let offer = app_state
        .db_client
        .get_project_offer(offer_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Offer not found"))?;

    if offer.status != OfferStatus::Pending {
        return Err(HttpError::bad_request(
            "Only pending offers can be withdrawn".to_string(),
        ));
    }

    let offer = app_state
        .db_client
        .respond_to_project_offer(offer_id, OfferStatus::Withdrawn, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(OfferResponseDto {
        status: "success".to_string(),
        offer,
    }))
}
