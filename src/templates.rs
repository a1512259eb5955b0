use axum::{http::StatusCode, response::Html};
use log::{debug, error};
use tera::{Context, Tera};

use crate::context::AppContext;

/// Every page extends `base.html`, which expects `user` and `toasts`.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn load(glob: &str) -> Result<Templates, tera::Error> {
        let tera = Tera::new(glob)?;
        debug!(
            "Loaded templates: {}",
            tera.get_template_names().collect::<Vec<_>>().join(", ")
        );
        Ok(Templates { tera })
    }

    pub fn render(
        &self,
        name: &str,
        ctx: &AppContext,
        mut context: Context,
    ) -> Result<Html<String>, StatusCode> {
        context.insert("user", &ctx.session.user());
        context.insert("toasts", &ctx.toasts.messages());

        match self.tera.render(name, &context) {
            Ok(rendered) => Ok(Html(rendered)),
            Err(err) => {
                error!("Failed to render {}: {:?}", name, err);
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
