use super::{deploy, runner, workflow, CodeTarget, CodeWorkflowTemplate, WorkflowFamily, DEPLOY_STEP_NAME};
use crate::workflow::document::{Scalar, Step, Workflow};

fn setup_python(version: &str) -> Step {
    Step::named("Set up Python version")
        .uses("actions/setup-python@v1")
        .with("python-version", Scalar::quoted(version))
}

/// Windows apps get a virtualenv zipped together with the sources.
pub struct PythonWindowsTemplate;

impl CodeWorkflowTemplate for PythonWindowsTemplate {
    fn family(&self) -> WorkflowFamily {
        WorkflowFamily::PythonWindows
    }

    fn build(&self, target: &CodeTarget<'_>) -> Workflow {
        let app = target.app;

        let steps = vec![
            setup_python(target.runtime_version),
            Step::named("Install Python dependencies").run(Scalar::block([
                "python -m venv env",
                ".\\env\\Scripts\\activate",
                "pip install -r requirements.txt",
            ])),
            Step::named("Zip the application files")
                .run(Scalar::plain("Compress-Archive .\\* app.zip")),
            deploy(
                Step::named_quoted(DEPLOY_STEP_NAME),
                app.display_name(),
                app,
                target.publish_profile_secret,
            )
            .with("package", Scalar::quoted(".\\app.zip")),
        ];

        workflow("Python", app, runner(false), steps)
    }
}

/// Linux apps are built by the App Service build action.
pub struct PythonLinuxTemplate;

impl CodeWorkflowTemplate for PythonLinuxTemplate {
    fn family(&self) -> WorkflowFamily {
        WorkflowFamily::PythonLinux
    }

    fn build(&self, target: &CodeTarget<'_>) -> Workflow {
        let app = target.app;

        let steps = vec![
            setup_python(target.runtime_version),
            Step::named("Build using AppService-Build")
                .uses("azure/appservice-build@v2")
                .with("platform", Scalar::plain("python"))
                .with("platform-version", Scalar::quoted(target.runtime_version)),
            deploy(
                Step::named_quoted(DEPLOY_STEP_NAME),
                app.display_name(),
                app,
                target.publish_profile_secret,
            ),
        ];

        workflow("Python", app, runner(true), steps)
    }
}
