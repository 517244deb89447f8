use super::{deploy, workflow, CodeTarget, CodeWorkflowTemplate, WorkflowFamily, DEPLOY_STEP_NAME};
use crate::workflow::document::{Scalar, Step, Workflow};

/// Title word of ASP.NET documents, the same one the Java WAR family uses
const APP_KIND: &str = "WAR";

/// .NET Framework apps build on Windows runners only, so the runtime version
/// and OS of the target are not used.
pub struct AspNetTemplate;

impl CodeWorkflowTemplate for AspNetTemplate {
    fn family(&self) -> WorkflowFamily {
        WorkflowFamily::AspNet
    }

    fn build(&self, target: &CodeTarget<'_>) -> Workflow {
        let app = target.app;

        let steps = vec![
            Step::named("Setup MSBuild path").uses("microsoft/setup-msbuild@v1.0.0"),
            Step::named("Setup NuGet").uses("NuGet/setup-nuget@v1.0.2"),
            Step::named("Restore NuGet packages").run(Scalar::plain("nuget restore")),
            Step::named("Publish to folder").run(Scalar::plain(
                "msbuild /nologo /verbosity:m /t:Build /t:pipelinePreDeployCopyAllFilesToOneFolder /p:_PackageTempDir=\"\\published\\\"",
            )),
            deploy(
                Step::named(DEPLOY_STEP_NAME),
                app.site_name.clone(),
                app,
                target.publish_profile_secret,
            )
            .with("package", Scalar::plain("\\published\\")),
        ];

        workflow(APP_KIND, app, Scalar::quoted("windows-latest"), steps)
    }
}
