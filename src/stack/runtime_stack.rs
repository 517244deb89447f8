crate::define_id_enum! {
    /// Runtime stack a code deployment is built for
    RuntimeStack {
        Node => "node" : "Node",
        Python => "python" : "Python",
        DotNetCore => "dotnetcore" : ".NET Core",
        Java8 => "java-8" : "Java 8",
        Java11 => "java-11" : "Java 11",
        AspNet => "aspnet" : "ASP.NET" | "asp.net",
    }
}

crate::define_id_enum! {
    /// Operating system a web app runs on
    Os {
        Windows => "windows" : "Windows",
        Linux => "linux" : "Linux",
    }
}

crate::define_id_enum! {
    /// Java web containers; only some of them take WAR packages
    JavaContainer {
        JavaSe => "java" : "Java SE",
        Tomcat => "tomcat" : "Tomcat",
    }
}

impl Os {
    pub fn from_is_linux(is_linux: bool) -> Self {
        if is_linux {
            Os::Linux
        } else {
            Os::Windows
        }
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, Os::Linux)
    }
}
