//! Maven builds for Java apps. WAR packages go to a servlet container and are
//! deployed under the bare site name; JAR packages use the slot display name.

use super::{deploy, runner, workflow, AppTarget, CodeTarget, CodeWorkflowTemplate, WorkflowFamily, DEPLOY_STEP_NAME};
use crate::workflow::document::{Scalar, Step, Workflow};

fn maven_steps(target: &CodeTarget<'_>, app_name: String, artifact: &str) -> Vec<Step> {
    let app: &AppTarget = target.app;

    vec![
        Step::named("Set up Java version")
            .uses("actions/setup-java@v1")
            .with("java-version", Scalar::quoted(target.runtime_version)),
        Step::named("Build with Maven").run(Scalar::plain("mvn clean install")),
        deploy(
            Step::named(DEPLOY_STEP_NAME),
            app_name,
            app,
            target.publish_profile_secret,
        )
        .with(
            "package",
            Scalar::quoted(format!("${{{{ github.workspace }}}}/target/*.{}", artifact)),
        ),
    ]
}

pub struct JavaJarTemplate;

impl CodeWorkflowTemplate for JavaJarTemplate {
    fn family(&self) -> WorkflowFamily {
        WorkflowFamily::JavaJar
    }

    fn build(&self, target: &CodeTarget<'_>) -> Workflow {
        let steps = maven_steps(target, target.app.display_name(), "jar");
        workflow("JAR", target.app, runner(target.is_linux), steps)
    }
}

pub struct JavaWarTemplate;

impl CodeWorkflowTemplate for JavaWarTemplate {
    fn family(&self) -> WorkflowFamily {
        WorkflowFamily::JavaWar
    }

    fn build(&self, target: &CodeTarget<'_>) -> Workflow {
        let steps = maven_steps(target, target.app.site_name.clone(), "war");
        workflow("WAR", target.app, runner(target.is_linux), steps)
    }
}
