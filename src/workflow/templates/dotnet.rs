use super::{deploy, runner, workflow, CodeTarget, CodeWorkflowTemplate, WorkflowFamily, DEPLOY_STEP_NAME};
use crate::workflow::document::{Scalar, Step, Workflow};

const PUBLISH_DIR: &str = "${{env.DOTNET_ROOT}}/myapp";

pub struct DotNetCoreTemplate;

impl CodeWorkflowTemplate for DotNetCoreTemplate {
    fn family(&self) -> WorkflowFamily {
        WorkflowFamily::DotNetCore
    }

    fn build(&self, target: &CodeTarget<'_>) -> Workflow {
        let app = target.app;

        let steps = vec![
            Step::named("Set up .NET Core")
                .uses("actions/setup-dotnet@v1")
                .with("dotnet-version", Scalar::quoted(target.runtime_version)),
            Step::named("Build with dotnet")
                .run(Scalar::plain("dotnet build --configuration Release")),
            Step::named("dotnet publish")
                .run(Scalar::plain(format!("dotnet publish -c Release -o {}", PUBLISH_DIR))),
            deploy(
                Step::named(DEPLOY_STEP_NAME),
                app.display_name(),
                app,
                target.publish_profile_secret,
            )
            .with("package", Scalar::plain(PUBLISH_DIR)),
        ];

        workflow("ASP.Net Core", app, runner(target.is_linux), steps)
    }
}
